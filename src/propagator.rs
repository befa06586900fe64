use opentelemetry::{
    baggage::BaggageExt,
    global::{self, Error},
    propagation::{
        text_map_propagator::FieldIter, Extractor, Injector, PropagationError, TextMapPropagator,
    },
    trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState},
    Context, KeyValue,
};
use std::borrow::Cow;

/// Header carrying the trace id, 32 (or legacy 16) hex characters.
pub const OT_TRACE_ID_HEADER: &str = "ot-tracer-traceid";
/// Header carrying the span id, 16 hex characters.
pub const OT_SPAN_ID_HEADER: &str = "ot-tracer-spanid";
/// Header carrying the sampling decision, `"true"` or `"false"`.
pub const OT_SAMPLED_HEADER: &str = "ot-tracer-sampled";
/// Prefix of the headers carrying baggage entries, one header per entry.
pub const OT_BAGGAGE_PREFIX: &str = "ot-baggage-";

const PADDING: &str = "0000000000000000";

/// `Propagator` implements the [ot-trace propagation format].
///
/// Trace context is carried in the three `ot-tracer-*` headers, baggage in
/// one `ot-baggage-<key>` header per entry. Legacy tracers emit 8-byte trace
/// ids; these are zero padded on the left to the 16-byte form on extraction.
///
/// [ot-trace propagation format]: https://github.com/opentracing/basictracer-python/blob/master/basictracer/text_propagator.py
#[derive(Clone, Debug)]
pub struct Propagator {
    fields: [String; 3],
}

// Implement default using Propagator::new() so both construction paths share one definition
impl Default for Propagator {
    fn default() -> Self {
        Propagator::new()
    }
}

impl Propagator {
    /// Create an ot-trace propagator.
    pub fn new() -> Self {
        Propagator {
            fields: [
                OT_TRACE_ID_HEADER.to_owned(),
                OT_SPAN_ID_HEADER.to_owned(),
                OT_SAMPLED_HEADER.to_owned(),
            ],
        }
    }

    /// Extract a trace id from the header.
    ///
    /// Legacy 8-byte trace ids are zero padded on the left to the canonical
    /// 16-byte form before parsing. Any other length but 32 is invalid.
    fn extract_trace_id(&self, trace_id: &str) -> Result<TraceId, ()> {
        let trace_id = if trace_id.len() == 16 {
            Cow::from(format!("{PADDING}{trace_id}"))
        } else {
            Cow::from(trace_id)
        };

        if trace_id.len() != 32 {
            return Err(());
        }

        TraceId::from_hex(&trace_id).map_err(|_| ())
    }

    /// Extract a span id from the header.
    fn extract_span_id(&self, span_id: &str) -> Result<SpanId, ()> {
        if span_id.len() != 16 {
            return Err(());
        }

        SpanId::from_hex(span_id).map_err(|_| ())
    }

    /// Extract the sampling decision from the header.
    ///
    /// Exactly `"true"` means sampled; any other value, including an absent
    /// header, means not sampled.
    fn extract_trace_flags(&self, sampled: &str) -> TraceFlags {
        if sampled == "true" {
            TraceFlags::SAMPLED
        } else {
            TraceFlags::default()
        }
    }

    /// Extract a span context from the `ot-tracer-*` headers.
    fn extract_span_context(&self, extractor: &dyn Extractor) -> Option<SpanContext> {
        let trace_id = extractor.get(OT_TRACE_ID_HEADER).unwrap_or("");
        let span_id = extractor.get(OT_SPAN_ID_HEADER).unwrap_or("");
        // A carrier without ot-tracer headers is not an error.
        if trace_id.is_empty() && span_id.is_empty() {
            return None;
        }

        let trace_flags = self.extract_trace_flags(extractor.get(OT_SAMPLED_HEADER).unwrap_or(""));

        match (
            self.extract_trace_id(trace_id),
            self.extract_span_id(span_id),
        ) {
            (Ok(trace_id), Ok(span_id)) => {
                let span_context =
                    SpanContext::new(trace_id, span_id, trace_flags, true, TraceState::default());
                if span_context.is_valid() {
                    Some(span_context)
                } else {
                    global::handle_error(Error::Propagation(PropagationError::extract(
                        "zero trace id or span id",
                        "OTTracePropagator",
                    )));
                    None
                }
            }
            _ => {
                global::handle_error(Error::Propagation(PropagationError::extract(
                    "invalid ot-tracer headers",
                    "OTTracePropagator",
                )));
                None
            }
        }
    }
}

/// Check that a baggage key forms a valid header name once prefixed.
///
/// Allowed characters are the conservative HTTP token characters: ascii
/// letters, digits and `` ^ _ ` - ! # $ % & ' * + . | ~ ``.
fn is_valid_header_name(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| {
            b.is_ascii_alphanumeric()
                || matches!(
                    b,
                    b'^' | b'_'
                        | b'`'
                        | b'-'
                        | b'!'
                        | b'#'
                        | b'$'
                        | b'%'
                        | b'&'
                        | b'\''
                        | b'*'
                        | b'+'
                        | b'.'
                        | b'|'
                        | b'~'
                )
        })
}

/// Check that a baggage value is representable as a header value: tab,
/// printable ascii or latin-1, nothing else.
fn is_valid_header_value(value: &str) -> bool {
    value
        .chars()
        .all(|c| c == '\t' || ('\x20'..='\x7e').contains(&c) || ('\u{80}'..='\u{ff}').contains(&c))
}

impl TextMapPropagator for Propagator {
    fn inject_context(&self, cx: &Context, injector: &mut dyn Injector) {
        let span = cx.span();
        let span_context = span.span_context();
        if !span_context.is_valid() {
            return;
        }

        injector.set(OT_TRACE_ID_HEADER, span_context.trace_id().to_string());
        injector.set(OT_SPAN_ID_HEADER, span_context.span_id().to_string());
        let sampled = if span_context.is_sampled() {
            "true"
        } else {
            "false"
        };
        injector.set(OT_SAMPLED_HEADER, sampled.to_string());

        for (key, (value, _metadata)) in cx.baggage().iter() {
            // Entries that cannot be represented as a header are dropped,
            // never escaped, to stay wire compatible with the unescaped ot
            // header convention.
            if !is_valid_header_name(key.as_str()) || !is_valid_header_value(&value.as_str()) {
                continue;
            }
            injector.set(
                &format!("{OT_BAGGAGE_PREFIX}{}", key.as_str()),
                value.as_str().into_owned(),
            );
        }
    }

    fn extract_with_context(&self, cx: &Context, extractor: &dyn Extractor) -> Context {
        let span_context = match self.extract_span_context(extractor) {
            Some(span_context) => span_context,
            None => return cx.clone(),
        };
        let cx = cx.with_remote_span_context(span_context);

        let baggage = extractor
            .keys()
            .into_iter()
            .filter_map(|key| {
                let name = key.strip_prefix(OT_BAGGAGE_PREFIX)?;
                extractor
                    .get(key)
                    .map(|value| KeyValue::new(name.to_owned(), value.to_owned()))
            })
            .collect::<Vec<_>>();

        if baggage.is_empty() {
            cx
        } else {
            cx.with_baggage(baggage)
        }
    }

    fn fields(&self) -> FieldIter<'_> {
        FieldIter::new(self.fields.as_ref())
    }
}
