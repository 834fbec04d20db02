//! Integration tests against a mock Medvise backend

mod chat;
mod guidelines;
mod mock_server;
