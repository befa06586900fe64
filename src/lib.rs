//! *Compiler support: [requires `rustc` 1.65+][msrv]*
//!
//! Interoperability with services instrumented by [OpenTracing] tracer
//! libraries that speak the legacy `ot` header format, such as the
//! basictracer family and the Lightstep tracers.
//!
//! Trace context is carried by the `ot-tracer-traceid`, `ot-tracer-spanid`
//! and `ot-tracer-sampled` headers, baggage by one `ot-baggage-<key>` header
//! per entry.
//!
//! [OpenTracing]: https://opentracing.io
//! [msrv]: #supported-rust-versions
//!
//! # Supported Rust Versions
//!
//! OpenTelemetry is built against the latest stable release. The minimum
//! supported version is 1.65. The current OpenTelemetry version is not
//! guaranteed to build on Rust versions earlier than the minimum supported
//! version.
//!
//! The current stable Rust compiler and the three most recent minor versions
//! before it will always be supported. For example, if the current stable
//! compiler version is 1.65, the minimum supported version will not be
//! increased past 1.47, three minor versions prior. Increasing the minimum
//! supported compiler version is not considered a semver breaking change as
//! long as doing so complies with this policy.
#![warn(
    future_incompatible,
    missing_debug_implementations,
    missing_docs,
    nonstandard_style,
    rust_2018_idioms,
    unreachable_pub,
    unused
)]
#![cfg_attr(
    docsrs,
    feature(doc_cfg, doc_auto_cfg),
    deny(rustdoc::broken_intra_doc_links)
)]
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/open-telemetry/opentelemetry-rust/main/assets/logo.svg"
)]
#![cfg_attr(test, deny(warnings))]

/// The ot-trace propagator propagates span contexts in the header format of
/// the legacy [OpenTracing] tracer libraries.
///
/// Cross-cutting concerns send their state to the next process using
/// `Propagator`s, which are defined as objects used to read and write
/// context data to and from messages exchanged by the applications.
///
/// Note that legacy tracers emit 8-byte trace ids; those are accepted on
/// extraction and zero padded to the 16-byte form.
///
/// ## Examples
/// ```
/// # use opentelemetry::{global, trace::{Tracer, TraceContextExt}, Context};
/// # use opentelemetry_ot_trace_propagator::Propagator as OTTracePropagator;
/// # fn send_request() {
/// // setup ot-trace propagator
/// global::set_text_map_propagator(OTTracePropagator::default());
///
/// // before sending requests to downstream services.
/// let mut headers = std::collections::HashMap::new(); // replace by http header of the outgoing request
/// let caller_span = global::tracer("caller").start("say hello");
/// let cx = Context::current_with_span(caller_span);
/// global::get_text_map_propagator(|propagator| {
///     propagator.inject_context(&cx, &mut headers); // propagator serialize the tracing context
/// });
/// // Send the request..
/// # }
///
///
/// # fn receive_request() {
/// // Receive the request sent above on the other service...
/// // setup ot-trace propagator
/// global::set_text_map_propagator(OTTracePropagator::new());
///
/// let headers = std::collections::HashMap::new(); // replace this with http header map from incoming requests.
/// let parent_context = global::get_text_map_propagator(|propagator| {
///      propagator.extract(&headers)
/// });
///
/// // this span's parent span will be caller_span in send_request functions.
/// let receiver_span = global::tracer("receiver").start_with_context("hello", &parent_context);
/// # }
/// ```
///
/// [OpenTracing]: https://opentracing.io
pub mod propagator;

pub use propagator::{
    Propagator, OT_BAGGAGE_PREFIX, OT_SAMPLED_HEADER, OT_SPAN_ID_HEADER, OT_TRACE_ID_HEADER,
};
