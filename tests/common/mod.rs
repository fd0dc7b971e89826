//! Shared test helpers: a scriptable in-memory host.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use serde_json::{json, Value};
use tokio::time::Instant;

use switchboard::host::{
    CapabilityNamespace, DownloadMonitor, EnvironmentFlags, Host, HostError, NativeMethod,
    NativeSession, NativeStream, StorageEstimate,
};
use switchboard::types::CapabilityKind;

/// How a scripted namespace answers availability checks.
#[derive(Clone)]
pub enum AvailabilityScript {
    /// Modern `availability()` returning this raw value.
    Modern(Value),
    /// Legacy `capabilities()` returning `{ available: raw }`.
    Legacy(Value),
    /// Never resolves.
    Hang,
    Fail(HostError),
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ConstructionScript {
    Factory,
    Constructor,
}

/// A capability namespace with canned behaviour.
pub struct ScriptedNamespace {
    availability: AvailabilityScript,
    construction: ConstructionScript,
    reject_construction: Option<String>,
    stream_method: NativeMethod,
    chunks: Vec<String>,
    fail_after: Option<usize>,
    direct_rewrite: Option<String>,
    progress: Vec<(u64, u64)>,
    /// Configurations passed to construction, in order.
    pub configs: Mutex<Vec<Value>>,
    /// Inputs seen by sessions, in order.
    pub inputs: Arc<Mutex<Vec<String>>>,
    pub destroyed: Arc<AtomicUsize>,
}

impl ScriptedNamespace {
    pub fn new(stream_method: NativeMethod) -> Self {
        Self {
            availability: AvailabilityScript::Modern(json!("available")),
            construction: ConstructionScript::Factory,
            reject_construction: None,
            stream_method,
            chunks: vec!["ok".to_string()],
            fail_after: None,
            direct_rewrite: None,
            progress: Vec::new(),
            configs: Mutex::new(Vec::new()),
            inputs: Arc::new(Mutex::new(Vec::new())),
            destroyed: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn chat() -> Self {
        Self::new(NativeMethod::PromptStreaming)
    }

    pub fn writer() -> Self {
        Self::new(NativeMethod::WriteStreaming)
    }

    pub fn rewriter() -> Self {
        Self::new(NativeMethod::RewriteStreaming)
    }

    pub fn availability(mut self, script: AvailabilityScript) -> Self {
        self.availability = script;
        self
    }

    pub fn raw_availability(self, raw: &str) -> Self {
        self.availability(AvailabilityScript::Modern(json!(raw)))
    }

    pub fn constructor_style(mut self) -> Self {
        self.construction = ConstructionScript::Constructor;
        self
    }

    pub fn reject_construction(mut self, reason: &str) -> Self {
        self.reject_construction = Some(reason.to_string());
        self
    }

    pub fn chunks(mut self, chunks: &[&str]) -> Self {
        self.chunks = chunks.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Fail the stream after `n` chunks.
    pub fn fail_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    pub fn direct_rewrite(mut self, output: &str) -> Self {
        self.direct_rewrite = Some(output.to_string());
        self
    }

    /// Progress events emitted through the monitor during construction.
    pub fn progress(mut self, events: &[(u64, u64)]) -> Self {
        self.progress = events.to_vec();
        self
    }

    pub fn last_config(&self) -> Option<Value> {
        self.configs.lock().unwrap().last().cloned()
    }

    pub fn construction_count(&self) -> usize {
        self.configs.lock().unwrap().len()
    }

    pub fn inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }

    pub fn destroyed_count(&self) -> usize {
        self.destroyed.load(Ordering::SeqCst)
    }

    fn build(
        &self,
        config: Value,
        monitor: Option<DownloadMonitor>,
    ) -> Result<Box<dyn NativeSession>, HostError> {
        self.configs.lock().unwrap().push(config);
        if let Some(reason) = &self.reject_construction {
            return Err(HostError::Rejected(reason.clone()));
        }
        if let Some(monitor) = monitor {
            for (loaded, total) in &self.progress {
                monitor.emit(*loaded, *total);
            }
        }
        Ok(Box::new(ScriptedSession {
            stream_method: self.stream_method,
            chunks: self.chunks.clone(),
            fail_after: self.fail_after,
            direct_rewrite: self.direct_rewrite.clone(),
            inputs: self.inputs.clone(),
            destroyed: self.destroyed.clone(),
        }))
    }
}

#[async_trait]
impl CapabilityNamespace for ScriptedNamespace {
    async fn availability(&self) -> Result<Value, HostError> {
        match &self.availability {
            AvailabilityScript::Modern(raw) => Ok(raw.clone()),
            AvailabilityScript::Legacy(_) => Err(HostError::NotSupported("availability".into())),
            AvailabilityScript::Hang => futures::future::pending().await,
            AvailabilityScript::Fail(e) => Err(e.clone()),
        }
    }

    async fn capabilities(&self) -> Result<Value, HostError> {
        match &self.availability {
            AvailabilityScript::Legacy(raw) => Ok(json!({ "available": raw })),
            _ => Err(HostError::NotSupported("capabilities".into())),
        }
    }

    async fn create(
        &self,
        config: Value,
        monitor: Option<DownloadMonitor>,
    ) -> Result<Box<dyn NativeSession>, HostError> {
        if self.construction != ConstructionScript::Factory {
            return Err(HostError::NotSupported("create".into()));
        }
        self.build(config, monitor)
    }

    async fn construct(
        &self,
        config: Value,
        monitor: Option<DownloadMonitor>,
    ) -> Result<Box<dyn NativeSession>, HostError> {
        if self.construction != ConstructionScript::Constructor {
            return Err(HostError::NotSupported("constructor".into()));
        }
        self.build(config, monitor)
    }
}

struct ScriptedSession {
    stream_method: NativeMethod,
    chunks: Vec<String>,
    fail_after: Option<usize>,
    direct_rewrite: Option<String>,
    inputs: Arc<Mutex<Vec<String>>>,
    destroyed: Arc<AtomicUsize>,
}

#[async_trait]
impl NativeSession for ScriptedSession {
    async fn stream(&self, method: NativeMethod, input: &str) -> Result<NativeStream, HostError> {
        if method != self.stream_method {
            return Err(HostError::NotSupported(method.to_string()));
        }
        self.inputs.lock().unwrap().push(input.to_string());
        let chunks = self.chunks.clone();
        let fail_after = self.fail_after;
        Ok(async_stream::stream! {
            for (i, chunk) in chunks.into_iter().enumerate() {
                if fail_after == Some(i) {
                    yield Err(HostError::Failed("generation interrupted".into()));
                    return;
                }
                yield Ok(chunk);
            }
        }
        .boxed())
    }

    async fn call(&self, method: NativeMethod, input: &str) -> Result<String, HostError> {
        match (&self.direct_rewrite, method) {
            (Some(output), NativeMethod::Rewrite) => {
                self.inputs.lock().unwrap().push(input.to_string());
                Ok(output.clone())
            }
            _ => Err(HostError::NotSupported(method.to_string())),
        }
    }

    fn destroy(&self) {
        self.destroyed.fetch_add(1, Ordering::SeqCst);
    }
}

/// An in-memory host whose namespaces can appear lazily.
pub struct ScriptedHost {
    namespaces: Mutex<HashMap<CapabilityKind, (Instant, Arc<dyn CapabilityNamespace>)>>,
    environment: EnvironmentFlags,
    storage: Result<Option<StorageEstimate>, HostError>,
    storage_hangs: bool,
}

impl ScriptedHost {
    pub fn new() -> Self {
        Self {
            namespaces: Mutex::new(HashMap::new()),
            environment: EnvironmentFlags {
                secure_context: Some(true),
                protocol: Some("https:".into()),
                cross_origin_isolated: Some(true),
            },
            storage: Ok(None),
            storage_hangs: false,
        }
    }

    pub fn with(self, kind: CapabilityKind, namespace: Arc<dyn CapabilityNamespace>) -> Self {
        self.with_delay(kind, namespace, Duration::ZERO)
    }

    /// The namespace becomes visible `delay` after now.
    pub fn with_delay(
        self,
        kind: CapabilityKind,
        namespace: Arc<dyn CapabilityNamespace>,
        delay: Duration,
    ) -> Self {
        self.namespaces
            .lock()
            .unwrap()
            .insert(kind, (Instant::now() + delay, namespace));
        self
    }

    pub fn environment(mut self, environment: EnvironmentFlags) -> Self {
        self.environment = environment;
        self
    }

    pub fn storage(mut self, storage: Result<Option<StorageEstimate>, HostError>) -> Self {
        self.storage = storage;
        self
    }

    pub fn hanging_storage(mut self) -> Self {
        self.storage_hangs = true;
        self
    }

    pub fn into_arc(self) -> Arc<dyn Host> {
        Arc::new(self)
    }
}

#[async_trait]
impl Host for ScriptedHost {
    fn namespace(&self, kind: CapabilityKind) -> Option<Arc<dyn CapabilityNamespace>> {
        let namespaces = self.namespaces.lock().unwrap();
        let (visible_at, namespace) = namespaces.get(&kind)?;
        (Instant::now() >= *visible_at).then(|| namespace.clone())
    }

    fn environment(&self) -> EnvironmentFlags {
        self.environment.clone()
    }

    async fn storage_estimate(&self) -> Result<Option<StorageEstimate>, HostError> {
        if self.storage_hangs {
            futures::future::pending::<()>().await;
        }
        self.storage.clone()
    }
}
