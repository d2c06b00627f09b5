// Copyright © Aptos Foundation
// SPDX-License-Identifier: Apache-2.0

use crate::state::State;

/// A successful API response: the decoded payload plus the ledger state the
/// node reported while answering.
#[derive(Debug)]
pub struct Response<T> {
    inner: T,
    state: State,
}

impl<T> Response<T> {
    pub fn new(inner: T, state: State) -> Self {
        Self { inner, state }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn into_parts(self) -> (T, State) {
        (self.inner, self.state)
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Response<U> {
        let (inner, state) = self.into_parts();
        Response::new(f(inner), state)
    }

    pub fn and_then<U, E, F>(self, f: F) -> Result<Response<U>, E>
    where
        F: FnOnce(T) -> Result<U, E>,
    {
        let (inner, state) = self.into_parts();
        f(inner).map(|new| Response::new(new, state))
    }
}
