//! Analyzer registration and identity.
//!
//! The registry owns every analyzer participating in a run. Identity is
//! the analyzer's declared name, and re-registering a used identity is
//! always an error: silently replacing or keeping both would invite
//! double-counting that no caller could detect from the results.

use crate::analyzer::base::Analyzer;
use crate::error::StatsError;
use std::collections::HashMap;
use tracing::debug;

/// What a caller may hand to [`Registry::register`]: an already-built
/// analyzer, or a factory that is materialized at registration time.
pub enum AnalyzerSource {
    Instance(Box<dyn Analyzer>),
    Factory(fn() -> Box<dyn Analyzer>),
}

impl AnalyzerSource {
    /// Wrap an owned analyzer value.
    pub fn instance(analyzer: impl Analyzer + 'static) -> Self {
        Self::Instance(Box::new(analyzer))
    }

    fn materialize(self) -> Box<dyn Analyzer> {
        match self {
            Self::Instance(analyzer) => analyzer,
            Self::Factory(factory) => factory(),
        }
    }
}

/// The set of registered analyzers, in registration order.
#[derive(Default)]
pub struct Registry {
    analyzers: Vec<Box<dyn Analyzer>>,
    index: HashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from an explicit table of sources. There is no
    /// ambient process-wide table; callers pass one in.
    pub fn from_table<I>(table: I) -> Result<Self, StatsError>
    where
        I: IntoIterator<Item = AnalyzerSource>,
    {
        let mut registry = Self::new();
        for source in table {
            registry.register(source)?;
        }
        Ok(registry)
    }

    /// Materialize `source` and store it under its declared name.
    /// Returns the identity on success.
    pub fn register(&mut self, source: AnalyzerSource) -> Result<String, StatsError> {
        let analyzer = source.materialize();
        let name = analyzer.name().to_string();

        if self.index.contains_key(&name) {
            return Err(StatsError::DuplicateAnalyzer(name));
        }

        debug!("Registered analyzer `{}`", name);
        self.index.insert(name.clone(), self.analyzers.len());
        self.analyzers.push(analyzer);
        Ok(name)
    }

    /// Convenience for registering an owned analyzer value.
    pub fn register_instance(
        &mut self,
        analyzer: impl Analyzer + 'static,
    ) -> Result<String, StatsError> {
        self.register(AnalyzerSource::instance(analyzer))
    }

    /// The analyzer registered under `name`.
    pub fn resolve(&self, name: &str) -> Result<&dyn Analyzer, StatsError> {
        match self.index.get(name) {
            Some(&i) => Ok(self.analyzers[i].as_ref()),
            None => Err(StatsError::UnknownAnalyzer(name.to_string())),
        }
    }

    pub fn resolve_mut(&mut self, name: &str) -> Result<&mut dyn Analyzer, StatsError> {
        match self.index.get(name) {
            Some(&i) => Ok(self.analyzers[i].as_mut()),
            None => Err(StatsError::UnknownAnalyzer(name.to_string())),
        }
    }

    /// Registered identities, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.analyzers.iter().map(|a| a.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.analyzers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.analyzers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Box<dyn Analyzer>> {
        self.analyzers.iter()
    }

    /// Mutable pass over the analyzers, in registration order. This is
    /// the dispatch order during a run.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn Analyzer>> {
        self.analyzers.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::CounterStore;

    struct NamedAnalyzer {
        name: String,
        store: CounterStore,
    }

    impl NamedAnalyzer {
        fn new(name: &str) -> Self {
            Self {
                name: name.to_string(),
                store: CounterStore::new(),
            }
        }
    }

    impl Analyzer for NamedAnalyzer {
        fn name(&self) -> &str {
            &self.name
        }

        fn reset(&mut self) {
            self.store.clear();
        }

        fn counters(&self) -> &CounterStore {
            &self.store
        }
    }

    #[test]
    fn test_register_returns_identity() {
        let mut registry = Registry::new();
        let name = registry
            .register_instance(NamedAnalyzer::new("some.analyzer"))
            .unwrap();
        assert_eq!(name, "some.analyzer");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let mut registry = Registry::new();
        registry
            .register_instance(NamedAnalyzer::new("some.analyzer"))
            .unwrap();

        let err = registry
            .register_instance(NamedAnalyzer::new("some.analyzer"))
            .unwrap_err();
        assert!(matches!(err, StatsError::DuplicateAnalyzer(name) if name == "some.analyzer"));

        // the first registration survives
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_distinct_names_are_independent() {
        let mut registry = Registry::new();
        registry
            .register_instance(NamedAnalyzer::new("first"))
            .unwrap();
        registry
            .register_instance(NamedAnalyzer::new("second"))
            .unwrap();

        assert!(registry.resolve("first").is_ok());
        assert!(registry.resolve("second").is_ok());
        assert_eq!(registry.names(), vec!["first", "second"]);
    }

    #[test]
    fn test_resolve_unknown() {
        let registry = Registry::new();
        assert!(matches!(
            registry.resolve("nope"),
            Err(StatsError::UnknownAnalyzer(name)) if name == "nope"
        ));
    }

    #[test]
    fn test_factory_registration() {
        fn make() -> Box<dyn Analyzer> {
            Box::new(NamedAnalyzer::new("made"))
        }

        let mut registry = Registry::new();
        registry.register(AnalyzerSource::Factory(make)).unwrap();
        assert_eq!(registry.names(), vec!["made"]);
    }

    #[test]
    fn test_from_table_preserves_order() {
        fn make_a() -> Box<dyn Analyzer> {
            Box::new(NamedAnalyzer::new("a"))
        }
        fn make_b() -> Box<dyn Analyzer> {
            Box::new(NamedAnalyzer::new("b"))
        }

        let registry = Registry::from_table(vec![
            AnalyzerSource::Factory(make_a),
            AnalyzerSource::Factory(make_b),
        ])
        .unwrap();
        assert_eq!(registry.names(), vec!["a", "b"]);
    }
}
