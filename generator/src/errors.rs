// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Generation failures

use config::ConfigError;
use id::IdError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum GenError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Id(#[from] IdError),
}
