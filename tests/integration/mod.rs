//! Integration Tests Module
//!
//! End-to-end tests for the analysis client: session runs over in-memory
//! transports, and runs against a local HTTP server speaking the backend's
//! NDJSON streaming protocol.


// HTTP client against a local raw-HTTP server
mod http_client_test;
