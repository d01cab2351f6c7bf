// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod contribution;
pub mod credentials;
pub mod portfolio;

pub use contribution::{level_of, ContributionDay, ContributionWeek, SourceTier};
pub use credentials::AdminCredentials;
pub use portfolio::PortfolioDocument;
