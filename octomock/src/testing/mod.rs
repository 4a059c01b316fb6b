//! Testing utilities for code built on the client.
//!
//! A [`UnitHelper`] owns a [`MockSession`] and an instance of the type under
//! test wired to it. After exercising the instance, assert on what it sent
//! with the `*_called_with` helpers, which accept the payload either
//! positionally or as the named `data` entry, as JSON text or raw text.

mod fixtures;
mod helper;
mod mock;

pub use fixtures::{
    create_example_data_helper, create_url_helper, fixture_exists, fixture_path, load_fixture,
    load_fixture_from,
};
pub use helper::{UnitHelper, create_mocked_session, create_session_mock};
pub use mock::{MockMethod, MockSession, VERBS};
