//! Generic table endpoint: the pair of bindings (row source, serializer) a table handler needs.

use crate::error::ConfigError;
use crate::schema::Serializer;
use crate::store::RowSource;
use std::sync::Arc;

/// Handler state for one table. Both bindings are required; a missing one is reported
/// per request as a configuration error rather than at construction.
#[derive(Clone, Default)]
pub struct TableEndpoint {
    source: Option<Arc<dyn RowSource>>,
    serializer: Option<Arc<Serializer>>,
}

impl TableEndpoint {
    pub fn new(source: Arc<dyn RowSource>, serializer: Arc<Serializer>) -> Self {
        TableEndpoint {
            source: Some(source),
            serializer: Some(serializer),
        }
    }

    /// No bindings; every request fails with a configuration error until both are set.
    pub fn unbound() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: Arc<dyn RowSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_serializer(mut self, serializer: Arc<Serializer>) -> Self {
        self.serializer = Some(serializer);
        self
    }

    pub fn bindings(&self) -> Result<(&dyn RowSource, &Serializer), ConfigError> {
        match (&self.source, &self.serializer) {
            (Some(source), Some(serializer)) => Ok((source.as_ref(), serializer.as_ref())),
            _ => Err(ConfigError::MissingBinding),
        }
    }
}
