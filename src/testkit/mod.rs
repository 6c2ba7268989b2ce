//! Instrumented stand-ins for the dependency interfaces commands consume.
//!
//! Each fake interface method is backed by a [`MethodCell`]: it records
//! every call's arguments, and picks its return value with the precedence
//! **stub > per-call-index override > default return**. All calls are also
//! appended to a shared [`InvocationLog`] keyed by method name. Every
//! piece of mutable state sits behind its own reader/writer lock, so
//! stand-ins are safe to drive and assert on from concurrent tasks.
//!
//! One stand-in instance per test; there is no global registry.

pub mod fakes;

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Append-only record of every call made on one stand-in instance,
/// keyed by method name, in call order across all methods.
#[derive(Default)]
pub struct InvocationLog {
    entries: RwLock<HashMap<String, Vec<Vec<String>>>>,
}

impl InvocationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, method: &str, args: Vec<String>) {
        self.entries
            .write()
            .unwrap()
            .entry(method.to_string())
            .or_default()
            .push(args);
    }

    /// A deep copy of the whole log. Later calls never show up in a
    /// snapshot already taken, and mutating the copy cannot touch the
    /// log itself.
    pub fn snapshot(&self) -> HashMap<String, Vec<Vec<String>>> {
        self.entries.read().unwrap().clone()
    }

    /// The recorded argument tuples for one method, in call order.
    pub fn calls(&self, method: &str) -> Vec<Vec<String>> {
        self.entries
            .read()
            .unwrap()
            .get(method)
            .cloned()
            .unwrap_or_default()
    }

    pub fn count(&self, method: &str) -> usize {
        self.entries
            .read()
            .unwrap()
            .get(method)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

type Stub<A, R> = Arc<dyn Fn(&A) -> R + Send + Sync>;

struct CellState<A, R> {
    calls: Vec<A>,
    stub: Option<Stub<A, R>>,
    default_return: Option<R>,
    per_call: HashMap<usize, R>,
}

impl<A, R> Default for CellState<A, R> {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            stub: None,
            default_return: None,
            per_call: HashMap::new(),
        }
    }
}

/// Per-method instrumentation: argument history plus scripted returns.
pub struct MethodCell<A, R> {
    method: &'static str,
    log: Arc<InvocationLog>,
    state: RwLock<CellState<A, R>>,
}

impl<A, R> MethodCell<A, R>
where
    A: Clone + Send + Sync,
    R: Clone + Send + Sync,
{
    pub fn new(method: &'static str, log: Arc<InvocationLog>) -> Self {
        Self {
            method,
            log,
            state: RwLock::new(CellState::default()),
        }
    }

    /// Full override: when set, the stub decides every return value,
    /// regardless of defaults or per-call overrides.
    pub fn set_stub(&self, stub: impl Fn(&A) -> R + Send + Sync + 'static) {
        self.state.write().unwrap().stub = Some(Arc::new(stub));
    }

    /// The value returned when neither a stub nor a per-call override
    /// applies.
    pub fn set_returns(&self, value: R) {
        self.state.write().unwrap().default_return = Some(value);
    }

    /// Override the return value for one call ordinal (0-based).
    pub fn set_returns_on_call(&self, call: usize, value: R) {
        self.state.write().unwrap().per_call.insert(call, value);
    }

    /// Calls made up to this moment.
    pub fn call_count(&self) -> usize {
        self.state.read().unwrap().calls.len()
    }

    /// The arguments of call `call` (0-based), if it has happened.
    pub fn args_for_call(&self, call: usize) -> Option<A> {
        self.state.read().unwrap().calls.get(call).cloned()
    }

    /// A copy of every recorded argument tuple, in call order.
    pub fn calls(&self) -> Vec<A> {
        self.state.read().unwrap().calls.clone()
    }

    /// Record a call and resolve its return value. `logged` is the
    /// display form appended to the shared invocation log. Returns
    /// `None` when nothing was configured for this call.
    pub fn invoke(&self, args: A, logged: Vec<String>) -> Option<R> {
        let (stub, scripted) = {
            let mut state = self.state.write().unwrap();
            let ordinal = state.calls.len();
            state.calls.push(args.clone());
            self.log.record(self.method, logged);
            let scripted = state
                .per_call
                .get(&ordinal)
                .cloned()
                .or_else(|| state.default_return.clone());
            (state.stub.clone(), scripted)
        };

        // The stub runs outside the lock so it may itself assert on the
        // cell without deadlocking.
        if let Some(stub) = stub {
            return Some(stub(&args));
        }
        scripted
    }
}
