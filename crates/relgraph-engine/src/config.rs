// Dweve Relgraph - Relational Data to Property Graph Conversion
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Engine configuration.

use crate::error::ConfigError;
use crate::progress::ProgressSink;
use relgraph_core::Value;
use relgraph_neo4j::WriterConfig;
use std::time::Duration;

/// Configuration for a [`crate::Converter`].
#[derive(Clone)]
pub struct ConverterConfig {
    /// Enable the worker pool. When false, resources are processed
    /// strictly in iterator order with one worker and batch size 1; this
    /// is the only mode that preserves iterator order in the graph.
    pub parallel: bool,
    /// Worker pool size. Defaults to `cores - 2`, at least 1.
    pub workers: usize,
    /// Resources per batch (the unit of commit and recovery).
    pub batch_size: usize,
    /// Per-transaction timeout; exceeding it counts as a transient error.
    pub transaction_timeout: Duration,
    /// Maximum retries per batch after transient graph errors.
    pub retry_max: u32,
    /// Base backoff between retries; doubles per attempt.
    pub retry_backoff: Duration,
    /// Optional progress event sink.
    pub progress_sink: Option<ProgressSink>,
}

fn default_workers() -> usize {
    num_cpus::get().saturating_sub(2).max(1)
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            workers: default_workers(),
            batch_size: 5000,
            transaction_timeout: Duration::from_secs(30),
            retry_max: 3,
            retry_backoff: Duration::from_millis(100),
            progress_sink: None,
        }
    }
}

impl std::fmt::Debug for ConverterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConverterConfig")
            .field("parallel", &self.parallel)
            .field("workers", &self.workers)
            .field("batch_size", &self.batch_size)
            .field("transaction_timeout", &self.transaction_timeout)
            .field("retry_max", &self.retry_max)
            .field("retry_backoff", &self.retry_backoff)
            .field("progress_sink", &self.progress_sink.is_some())
            .finish()
    }
}

impl ConverterConfig {
    /// Create a builder.
    pub fn builder() -> ConverterConfigBuilder {
        ConverterConfigBuilder::default()
    }

    /// Serialised preset: one worker, batch size 1, strict iterator order.
    pub fn serialised() -> Self {
        Self {
            parallel: false,
            workers: 1,
            batch_size: 1,
            ..Self::default()
        }
    }

    /// Check invariants, failing fast before any work starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers < 1 {
            return Err(ConfigError::new("workers must be at least 1"));
        }
        if self.batch_size < 1 {
            return Err(ConfigError::new("batch_size must be at least 1"));
        }
        Ok(())
    }

    /// Build a configuration from string-keyed options.
    ///
    /// Recognised keys: `parallel` (bool), `workers` (int), `batch_size`
    /// (int), `transaction_timeout_ms` (int), `retry_max` (int),
    /// `retry_backoff_ms` (int). Unrecognised keys fail fast.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let mut config = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "parallel" => {
                    config.parallel = value
                        .as_bool()
                        .ok_or_else(|| ConfigError::new("'parallel' must be a boolean"))?;
                }
                "workers" => {
                    config.workers = positive_int(&value, "workers")? as usize;
                }
                "batch_size" => {
                    config.batch_size = positive_int(&value, "batch_size")? as usize;
                }
                "transaction_timeout_ms" => {
                    config.transaction_timeout =
                        Duration::from_millis(non_negative_int(&value, "transaction_timeout_ms")?);
                }
                "retry_max" => {
                    config.retry_max = non_negative_int(&value, "retry_max")? as u32;
                }
                "retry_backoff_ms" => {
                    config.retry_backoff =
                        Duration::from_millis(non_negative_int(&value, "retry_backoff_ms")?);
                }
                other => {
                    return Err(ConfigError::new(format!(
                        "unrecognised option '{}'",
                        other
                    )));
                }
            }
        }
        config.validate()?;
        Ok(config)
    }

    /// The writer settings derived from this configuration.
    pub fn writer_config(&self) -> WriterConfig {
        WriterConfig {
            transaction_timeout: self.transaction_timeout,
            retry_max: self.retry_max,
            retry_backoff: self.retry_backoff,
        }
    }
}

fn positive_int(value: &Value, key: &str) -> Result<u64, ConfigError> {
    match value.as_int() {
        Some(n) if n >= 1 => Ok(n as u64),
        _ => Err(ConfigError::new(format!(
            "'{}' must be an integer >= 1",
            key
        ))),
    }
}

fn non_negative_int(value: &Value, key: &str) -> Result<u64, ConfigError> {
    match value.as_int() {
        Some(n) if n >= 0 => Ok(n as u64),
        _ => Err(ConfigError::new(format!(
            "'{}' must be an integer >= 0",
            key
        ))),
    }
}

/// Builder for [`ConverterConfig`].
pub struct ConverterConfigBuilder {
    config: ConverterConfig,
}

impl Default for ConverterConfigBuilder {
    fn default() -> Self {
        Self {
            config: ConverterConfig::default(),
        }
    }
}

impl ConverterConfigBuilder {
    /// Enable or disable the worker pool.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// Set the worker pool size.
    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    /// Set the batch size.
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.config.batch_size = batch_size;
        self
    }

    /// Set the per-transaction timeout.
    pub fn transaction_timeout(mut self, timeout: Duration) -> Self {
        self.config.transaction_timeout = timeout;
        self
    }

    /// Set the maximum retry count.
    pub fn retry_max(mut self, retry_max: u32) -> Self {
        self.config.retry_max = retry_max;
        self
    }

    /// Set the base retry backoff.
    pub fn retry_backoff(mut self, backoff: Duration) -> Self {
        self.config.retry_backoff = backoff;
        self
    }

    /// Set the progress sink.
    pub fn progress_sink(mut self, sink: ProgressSink) -> Self {
        self.config.progress_sink = Some(sink);
        self
    }

    /// Finish, validating the configuration.
    pub fn build(self) -> Result<ConverterConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConverterConfig::default();
        assert!(config.parallel);
        assert!(config.workers >= 1);
        assert_eq!(config.batch_size, 5000);
        assert_eq!(config.retry_max, 3);
    }

    #[test]
    fn test_serialised_preset() {
        let config = ConverterConfig::serialised();
        assert!(!config.parallel);
        assert_eq!(config.workers, 1);
        assert_eq!(config.batch_size, 1);
    }

    #[test]
    fn test_builder() {
        let config = ConverterConfig::builder()
            .parallel(true)
            .workers(4)
            .batch_size(100)
            .retry_max(0)
            .build()
            .unwrap();
        assert_eq!(config.workers, 4);
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.retry_max, 0);
    }

    #[test]
    fn test_validation_rejects_zero_workers() {
        let err = ConverterConfig::builder().workers(0).build().unwrap_err();
        assert!(err.to_string().contains("workers"));
    }

    #[test]
    fn test_validation_rejects_zero_batch_size() {
        let err = ConverterConfig::builder().batch_size(0).build().unwrap_err();
        assert!(err.to_string().contains("batch_size"));
    }

    #[test]
    fn test_from_pairs() {
        let config = ConverterConfig::from_pairs(vec![
            ("parallel".to_string(), Value::Bool(false)),
            ("batch_size".to_string(), Value::Int(10)),
            ("retry_backoff_ms".to_string(), Value::Int(5)),
        ])
        .unwrap();
        assert!(!config.parallel);
        assert_eq!(config.batch_size, 10);
        assert_eq!(config.retry_backoff, Duration::from_millis(5));
    }

    #[test]
    fn test_from_pairs_rejects_unknown_key() {
        let err = ConverterConfig::from_pairs(vec![(
            "batchsize".to_string(),
            Value::Int(10),
        )])
        .unwrap_err();
        assert!(err.to_string().contains("unrecognised option 'batchsize'"));
    }

    #[test]
    fn test_from_pairs_rejects_wrong_type() {
        let err =
            ConverterConfig::from_pairs(vec![("workers".to_string(), Value::from("four"))])
                .unwrap_err();
        assert!(err.to_string().contains("workers"));
    }
}
