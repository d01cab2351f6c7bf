// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod auth_token;
pub mod calendar;
pub mod contributions;
pub mod credentials;
pub mod portfolio;
pub mod sources;
pub mod synthesis;

pub use auth_token::AuthTokenService;
pub use calendar::bucket_by_week;
pub use contributions::{ContributionService, ResolvedContributions};
pub use credentials::CredentialStore;
pub use portfolio::PortfolioService;
pub use sources::{ApiSource, MarkupSource, SourceFormat};
