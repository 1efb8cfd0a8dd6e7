// Copyright 2024 The Kubernetes Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Admission error types.

use thiserror::Error;

/// Result type for admission operations.
pub type AdmissionResult<T> = Result<T, AdmissionError>;

/// AdmissionError represents errors that can occur during admission.
///
/// A per-request error returned from `admit` is surfaced to the requester as
/// an admission denial, so plugins that must never block unrelated traffic
/// absorb their recoverable conditions and return `Ok(())` instead.
#[derive(Debug, Error)]
pub enum AdmissionError {
    /// Internal represents an internal error.
    #[error("internal error: {0}")]
    Internal(String),

    /// Config indicates a plugin's configuration could not be loaded.
    /// Raised at registration time; fatal for process startup.
    #[error("config error: {0}")]
    Config(String),
}

impl AdmissionError {
    /// Create an Internal error.
    pub fn internal_error(msg: impl Into<String>) -> Self {
        AdmissionError::Internal(msg.into())
    }

    /// Create a Config error.
    pub fn config_error(msg: impl Into<String>) -> Self {
        AdmissionError::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_error_display() {
        let err = AdmissionError::internal_error("unknown admission plugin: Foo");
        assert_eq!(err.to_string(), "internal error: unknown admission plugin: Foo");
    }

    #[test]
    fn test_config_error_display() {
        let err = AdmissionError::config_error("parsing DNS injection config: bad yaml");
        assert!(err.to_string().starts_with("config error:"));
        assert!(err.to_string().contains("bad yaml"));
    }
}
