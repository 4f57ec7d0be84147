// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Studmount Team

//! Rendering parts by name on the mesh backend

use crate::config::KernelConfig;
use crate::error::{ConfigError, PartResult};
use crate::geometry::analytics::{analyze, GeometryStats};
use crate::geometry::{Mesh, MeshBackend};
use crate::params::{ParameterMap, ParameterValue};
use crate::parts;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One part to render and its parameter overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderRequest {
    pub part: String,
    #[serde(default)]
    pub overrides: ParameterMap,
}

impl RenderRequest {
    pub fn new(part: impl Into<String>) -> Self {
        Self {
            part: part.into(),
            overrides: ParameterMap::new(),
        }
    }

    pub fn with_override(mut self, name: &str, value: impl Into<ParameterValue>) -> Self {
        self.overrides.insert(name.to_string(), value.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct RenderedPart {
    pub name: String,
    pub pieces: Vec<Mesh>,
}

impl RenderedPart {
    pub fn stats(&self) -> Vec<GeometryStats> {
        self.pieces.iter().map(analyze).collect()
    }

    pub fn triangle_count(&self) -> usize {
        self.pieces.iter().map(Mesh::triangle_count).sum()
    }
}

/// Render the part called `name` with `overrides` applied to its defaults
pub fn render(name: &str, overrides: &ParameterMap, config: &KernelConfig) -> PartResult<RenderedPart> {
    let generator = parts::find::<MeshBackend>(name)
        .ok_or_else(|| ConfigError::UnknownPart(name.to_string()))?;
    let backend = MeshBackend::from_config(config);
    let pieces = generator.render(&backend, overrides)?.into_pieces();
    debug!(part = name, pieces = pieces.len(), "rendered");

    Ok(RenderedPart {
        name: name.to_string(),
        pieces,
    })
}

/// Render independent requests in parallel, one result per request in input order
pub fn render_batch(requests: &[RenderRequest], config: &KernelConfig) -> Vec<PartResult<RenderedPart>> {
    let run = || {
        requests
            .par_iter()
            .map(|request| render(&request.part, &request.overrides, config))
            .collect()
    };

    match rayon::ThreadPoolBuilder::new()
        .num_threads(config.worker_threads())
        .build()
    {
        Ok(pool) => pool.install(run),
        Err(err) => {
            warn!(error = %err, "falling back to the global thread pool");
            run()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PartError;

    fn small_config() -> KernelConfig {
        KernelConfig {
            segments: 12,
            ..KernelConfig::default()
        }
    }

    #[test]
    fn test_unknown_part() {
        let err = render("teapot", &ParameterMap::new(), &small_config()).unwrap_err();
        assert!(matches!(err, PartError::Config(ConfigError::UnknownPart(ref n)) if n == "teapot"));
    }

    #[test]
    fn test_batch_keeps_input_order() {
        let requests = vec![
            RenderRequest::new("axle_block"),
            RenderRequest::new("missing"),
            RenderRequest::new("stud_board")
                .with_override("width", 2i64)
                .with_override("length", 2i64),
        ];
        let results = render_batch(&requests, &small_config());

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().name, "axle_block");
        assert!(results[1].is_err());
        let board = results[2].as_ref().unwrap();
        assert_eq!(board.name, "stud_board");
        assert_eq!(board.pieces.len(), 1);
        assert!(board.triangle_count() > 12);
    }
}
