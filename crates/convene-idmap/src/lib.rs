//! # convene-idmap
//!
//! Identifier bridge between the current participant id space and the legacy
//! invitee/attendee id spaces.
//!
//! Lookups go over an asynchronous request/reply channel to an external
//! resolution service. A missing mapping (`Ok(None)`) is kept distinct from an
//! unreachable service (`Err`).
//!
//! ## Cargo Features
//!
//! - `nats` (default): live transport over NATS request/reply
//!
//! ## Example
//!
//! ```rust,ignore
//! use convene_core::{AppEnvironment, SubResourceKind};
//! use convene_idmap::{build_mapper, IdMapConfig};
//!
//! let config = IdMapConfig::from_env()?;
//! let mapper = build_mapper(&config, AppEnvironment::from_env()).await?;
//!
//! let invitee_id = mapper
//!     .sub_resource_id(SubResourceKind::Invitee, &participant_id)
//!     .await?;
//! ```

pub mod config;
pub mod error;
pub mod mapper;
pub mod messaging;

#[cfg(feature = "nats")]
pub mod nats;

use std::sync::Arc;

use convene_core::AppEnvironment;
use tracing::{info, warn};

pub use config::{IdMapConfig, IdMapConfigBuilder};
pub use error::{IdMapError, IdMapResult};
pub use mapper::{IdMapper, IdNamespace, NoopIdMapper};
pub use messaging::{MessagingIdMapper, RequestReply};

#[cfg(feature = "nats")]
pub use nats::{connect_mapper, NatsTransport};

/// Pick the pass-through mapper if allowed, or `None` for a live mapper.
///
/// In production the pass-through mapper needs `allow_noop_in_production`.
pub fn noop_mapper_if_disabled(
    config: &IdMapConfig,
    environment: AppEnvironment,
) -> IdMapResult<Option<NoopIdMapper>> {
    if !config.disabled {
        return Ok(None);
    }

    if environment.is_production() {
        if !config.allow_noop_in_production {
            return Err(IdMapError::ConfigInvalid {
                var: "ID_MAPPING_DISABLED".to_string(),
                reason: "identifier mapping cannot be disabled in production without ID_MAPPING_ALLOW_NOOP=true".to_string(),
            });
        }
        warn!(
            target: "security",
            "Identifier mapping disabled in production by explicit opt-in"
        );
    }

    Ok(Some(NoopIdMapper::new()))
}

/// Build the mapper selected by `config`.
pub async fn build_mapper(
    config: &IdMapConfig,
    environment: AppEnvironment,
) -> IdMapResult<Arc<dyn IdMapper>> {
    if let Some(noop) = noop_mapper_if_disabled(config, environment)? {
        return Ok(Arc::new(noop));
    }

    #[cfg(feature = "nats")]
    {
        let mapper = connect_mapper(config).await?;
        info!(
            subject_prefix = %config.subject_prefix,
            timeout_ms = config.timeout.as_millis(),
            "Identifier mapping enabled"
        );
        Ok(Arc::new(mapper))
    }

    #[cfg(not(feature = "nats"))]
    {
        info!("No live identifier transport compiled in");
        Err(IdMapError::ConfigInvalid {
            var: "ID_MAPPING_DISABLED".to_string(),
            reason: "built without the `nats` feature; set ID_MAPPING_DISABLED=true".to_string(),
        })
    }
}
