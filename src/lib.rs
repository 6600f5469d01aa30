//! Keyboard-driven narration over a parsed HTML page.
//!
//! A [`controller::Controller`] turns key presses and clicks into focus
//! moves, sentence stepping, highlighting and speech. The
//! [`event_loop::EventLoop`] feeds it host events line by line.

pub mod cancellation;
pub mod config;
pub mod controller;
pub mod cursor;
pub mod describe;
pub mod dom;
pub mod event_loop;
pub mod highlight;
pub mod label;
pub mod navigator;
pub mod session;
pub mod settings;
pub mod speech;
pub mod text_utils;
