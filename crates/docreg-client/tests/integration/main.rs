//! Integration tests for docreg-client
//!
//! Uses wiremock to stand in for the registration API and drives the
//! submitter through the real reqwest transport.

mod common;

mod test_rate_limit;
mod test_submit;
