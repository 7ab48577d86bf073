// Copyright 2026 Boundless Foundation, Inc.
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

use thiserror::Error;

/// Errors that carry a stable code for logs and support requests.
pub trait CodedError: std::error::Error {
    fn code(&self) -> &str;
}

/// Implements `Debug` as `<code> <display>` for a [CodedError].
#[macro_export]
macro_rules! impl_coded_debug {
    ($err:ident) => {
        impl std::fmt::Debug for $err {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{} {}", $crate::errors::CodedError::code(self), self)
            }
        }
    };
}

#[derive(Error)]
pub enum ExplorerError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error from {url}: {status}")]
    Api { status: reqwest::StatusCode, url: String },

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Unknown filter {filter:?} for {context} activity")]
    UnknownFilter { context: String, filter: String },

    #[error("Unknown entity context {0:?}, expected hotspot, account or validator")]
    UnknownContext(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl_coded_debug!(ExplorerError);

impl CodedError for ExplorerError {
    fn code(&self) -> &str {
        match self {
            ExplorerError::Http(_) => "[E-SRC-1001]",
            ExplorerError::Api { .. } => "[E-SRC-1002]",
            ExplorerError::Url(_) => "[E-SRC-1003]",
            ExplorerError::UnknownFilter { .. } => "[E-NAV-2001]",
            ExplorerError::UnknownContext(_) => "[E-NAV-2002]",
            ExplorerError::Config(_) => "[E-CON-3001]",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_includes_code() {
        let err = ExplorerError::UnknownFilter {
            context: "hotspot".into(),
            filter: "Payments".into(),
        };
        assert_eq!(
            format!("{err:?}"),
            "[E-NAV-2001] Unknown filter \"Payments\" for hotspot activity"
        );
    }
}
