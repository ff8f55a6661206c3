//! Test suites for the message bridge.

mod support;
