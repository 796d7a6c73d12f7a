// -------------------------------------------------------------------------
// SPDX-FileCopyrightText: Copyright © 2025 The Typhon Project
// SPDX-FileName: crates/corvid-compiler/src/lib.rs
// SPDX-FileType: SOURCE
// SPDX-License-Identifier: Apache-2.0
// -------------------------------------------------------------------------
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
// -------------------------------------------------------------------------
//! Whole-program orchestration for the corvid front end: the
//! [`driver::Driver`] that enumerates CLI inputs and runs every file
//! through `corvid-parser` and `corvid-analyzer`, and the
//! [`backend::Program`] read-only query interface a code generator would
//! consume the result through.

pub mod backend;
pub mod driver;
pub mod error;

pub use backend::Program;
pub use driver::Driver;
pub use error::{CompileError, CompileResult};
