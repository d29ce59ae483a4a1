#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Simulated safety assistant.
//!
//! The assistant panel is entirely canned: the transcript opens with a
//! scripted exchange, user messages are echoed into the list, and a
//! fixed holding reply arrives after a short delay. The one data-driven
//! piece is the risk label, computed from the count of recent reports
//! near the viewed location.

pub mod risk;
pub mod transcript;

pub use risk::{RiskAssessment, RiskLabel, assess};
pub use transcript::{ChatMessage, Role, SUGGESTED_PROMPTS, Transcript};
