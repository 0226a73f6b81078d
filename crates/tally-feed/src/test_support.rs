//! Shared test utilities for tally-feed unit tests.
