//! In-memory client and observer used by the unit tests.

use crate::observer::{Observer, QueryClient, ResultCallback};
use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use synq_core::{
    Descriptor, NotifyOptions, QueryDefaults, QueryHash, QueryKey, QueryOptions, QueryResult,
};

pub type TestResult = QueryResult<String>;

/// Calls made against the fake collaborators.
#[derive(Default, Debug)]
pub struct CallLog {
    pub created: usize,
    pub set_options: usize,
    pub subscribed: Vec<usize>,
    pub destroyed: Vec<usize>,
}

pub struct FakeObserver {
    id: usize,
    options: RefCell<QueryOptions>,
    result: RefCell<TestResult>,
    callbacks: RefCell<Vec<Rc<dyn Fn(TestResult)>>>,
    destroyed: Cell<bool>,
    log: Rc<RefCell<CallLog>>,
}

impl FakeObserver {
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.get()
    }

    /// Simulates a completed fetch.
    pub fn resolve(&self, data: &str) {
        self.emit(QueryResult::success(data.to_string()));
    }

    pub fn emit(&self, result: TestResult) {
        *self.result.borrow_mut() = result.clone();
        let callbacks = self.callbacks.borrow().clone();
        for cb in callbacks {
            cb(result.clone());
        }
    }

    fn rebound_result(&self, options: &QueryOptions) -> TestResult {
        let current = self.result.borrow().clone();
        if self.options.borrow().query_hash == options.query_hash {
            current
        } else if options.keep_previous_data() && current.data.is_some() {
            current.previous_data()
        } else {
            QueryResult::pending()
        }
    }
}

impl Observer for FakeObserver {
    type Options = QueryOptions;
    type Result = TestResult;

    fn query_hash(&self) -> Option<QueryHash> {
        self.options.borrow().query_hash.clone()
    }

    fn set_options(&self, options: &QueryOptions, _notify: NotifyOptions) {
        self.log.borrow_mut().set_options += 1;
        let result = self.rebound_result(options);
        *self.result.borrow_mut() = result;
        *self.options.borrow_mut() = options.clone();
    }

    fn current_result(&self) -> TestResult {
        self.result.borrow().clone()
    }

    fn optimistic_result(&self, options: &QueryOptions) -> TestResult {
        self.rebound_result(options)
    }

    fn subscribe(&self, on_change: ResultCallback<TestResult>) {
        self.log.borrow_mut().subscribed.push(self.id);
        self.callbacks.borrow_mut().push(Rc::from(on_change));
    }

    fn destroy(&self) {
        self.log.borrow_mut().destroyed.push(self.id);
        self.destroyed.set(true);
        self.callbacks.borrow_mut().clear();
    }
}

#[derive(Default)]
pub struct FakeClient {
    defaults: QueryDefaults,
    next_id: Cell<usize>,
    pub log: Rc<RefCell<CallLog>>,
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }
}

impl QueryClient for FakeClient {
    type Options = QueryOptions;
    type Observer = FakeObserver;

    fn default_query_options(&self, options: &QueryOptions) -> QueryOptions {
        options.normalized(&self.defaults)
    }

    fn build_observer(&self, options: &QueryOptions) -> Rc<FakeObserver> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.log.borrow_mut().created += 1;
        Rc::new(FakeObserver {
            id,
            options: RefCell::new(options.clone()),
            result: RefCell::new(QueryResult::pending()),
            callbacks: RefCell::new(Vec::new()),
            destroyed: Cell::new(false),
            log: self.log.clone(),
        })
    }
}

pub fn query(name: &str) -> QueryOptions {
    QueryOptions::new(QueryKey::new([name]))
}

pub fn retaining(name: &str) -> QueryOptions {
    query(name).with_keep_previous_data(true)
}
