//! Shared fakes for the integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use synq_core::{
    Descriptor, NotifyOptions, QueryDefaults, QueryHash, QueryKey, QueryOptions, QueryResult,
};
use synq_reactive::{NotifyManager, Observer, QueriesObserver, QueryClient, ResultCallback};

pub type TestResult = QueryResult<String>;

/// Installs a test-friendly subscriber once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

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
    log: Rc<RefCell<CallLog>>,
}

impl FakeObserver {
    pub fn id(&self) -> usize {
        self.id
    }

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
        self.callbacks.borrow_mut().clear();
    }
}

#[derive(Default)]
pub struct FakeClient {
    pub defaults: QueryDefaults,
    next_id: Cell<usize>,
    pub log: Rc<RefCell<CallLog>>,
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults(defaults: QueryDefaults) -> Self {
        Self {
            defaults,
            ..Self::default()
        }
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

pub fn queries(names: &[&str]) -> Vec<QueryOptions> {
    names.iter().map(|n| query(n)).collect()
}

pub fn reconciler(queries: Vec<QueryOptions>) -> QueriesObserver<FakeClient> {
    QueriesObserver::new(FakeClient::new(), Rc::new(NotifyManager::new()), queries)
}

/// Subscribes a listener that records every published snapshot.
pub fn record(observer: &QueriesObserver<FakeClient>) -> (u64, Rc<RefCell<Vec<Vec<TestResult>>>>) {
    let published = Rc::new(RefCell::new(Vec::new()));
    let sink = published.clone();
    let id = observer.subscribe(move |snapshot| sink.borrow_mut().push(snapshot.to_vec()));
    (id, published)
}

pub fn data(results: &[TestResult]) -> Vec<Option<String>> {
    results.iter().map(|r| r.data.clone()).collect()
}

pub fn observer_ids(observer: &QueriesObserver<FakeClient>) -> Vec<usize> {
    observer.observers().iter().map(|o| o.id()).collect()
}
