//! # Descriptor Module
//!
//! The read-only model of an RPC interface description: files, services,
//! methods, HTTP bindings, messages and enums. Descriptors are loaded from
//! YAML or JSON documents and paired with a [`Registry`] for name lookups.
//!
//! ```yaml
//! name: echo/v1/echo.proto
//! package: echo.v1
//! go_package: { path: github.com/acme/echo/echopb, name: echopb }
//! messages:
//!   - name: .echo.v1.SayRequest
//!     fields:
//!       - { name: text, type_name: string }
//! services:
//!   - name: echo
//!     methods:
//!       - name: say
//!         request_type: .echo.v1.SayRequest
//!         response_type: .echo.v1.SayResponse
//!         bindings:
//!           - { http_method: POST, path_template: /v1/say, body: { field_path: "" } }
//! ```
//!
//! Bindings without an explicit `index` are numbered by position. Path
//! parameter targets are resolved against the request message at load time.

mod load;
mod registry;
mod types;

pub use load::*;
pub use registry::*;
pub use types::*;
