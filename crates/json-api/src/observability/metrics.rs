//! Prometheus metrics collection and exposition endpoint.

use std::sync::OnceLock;

use prometheus::{
    HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TEXT_FORMAT,
    TextEncoder, core::Collector,
};
use salvo::{
    Response, handler,
    http::{
        StatusCode,
        header::{CONTENT_TYPE, HeaderValue},
    },
};
use tracing::error;

#[derive(Debug)]
struct ServiceMetrics {
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration_seconds: HistogramVec,
    requests_in_flight: IntGauge,
    participation_events_total: IntCounterVec,
}

/// Participation operations counted by outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParticipationEvent {
    Join,
    Progress,
}

impl ParticipationEvent {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Join => "join",
            Self::Progress => "progress",
        }
    }
}

const LATENCY_BUCKETS: [f64; 13] = [
    0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];


static SERVICE_METRICS: OnceLock<Option<ServiceMetrics>> = OnceLock::new();

#[derive(Debug)]
pub(super) struct InFlightRequestGuard {
    tracked: bool,
}

impl InFlightRequestGuard {
    pub(super) fn track() -> Self {
        if let Some(metrics) = metrics() {
            metrics.requests_in_flight.inc();
            return Self { tracked: true };
        }

        Self { tracked: false }
    }
}

impl Drop for InFlightRequestGuard {
    fn drop(&mut self) {
        if self.tracked
            && let Some(metrics) = metrics()
        {
            metrics.requests_in_flight.dec();
        }
    }
}

pub(super) fn observe_request(method: &str, route: &str, status_code: u16, duration_seconds: f64) {
    let Some(metrics) = metrics() else {
        return;
    };

    let status_class = status_class(status_code);
    let status_code = status_code.to_string();

    metrics
        .requests_total
        .with_label_values(&[method, route, status_class, status_code.as_str()])
        .inc();

    metrics
        .request_duration_seconds
        .with_label_values(&[method, route])
        .observe(duration_seconds);
}

pub(crate) fn observe_participation(event: ParticipationEvent, outcome: &str) {
    let Some(metrics) = metrics() else {
        return;
    };

    metrics
        .participation_events_total
        .with_label_values(&[event.as_str(), outcome])
        .inc();
}

/// Prometheus text exposition of every registered metric.
#[handler]
pub(crate) async fn metrics_handler(res: &mut Response) {
    let Some(metrics) = metrics() else {
        res.status_code(StatusCode::SERVICE_UNAVAILABLE);
        return;
    };

    match TextEncoder::new().encode_to_string(&metrics.registry.gather()) {
        Ok(body) => {
            res.headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static(TEXT_FORMAT));
            res.render(body);
        }
        Err(source) => {
            error!("failed to encode metrics: {source}");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}

fn metrics() -> Option<&'static ServiceMetrics> {
    SERVICE_METRICS
        .get_or_init(|| {
            ServiceMetrics::register()
                .inspect_err(|source| error!("failed to register metrics: {source}"))
                .ok()
        })
        .as_ref()
}

impl ServiceMetrics {
    fn register() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let requests_total = registered(
            &registry,
            IntCounterVec::new(
                Opts::new(
                    "rave_json_http_requests_total",
                    "HTTP requests by method, route, status class and status code.",
                ),
                &["method", "route", "status_class", "status_code"],
            )?,
        )?;

        let request_duration_seconds = registered(
            &registry,
            HistogramVec::new(
                HistogramOpts::new(
                    "rave_json_http_request_duration_seconds",
                    "HTTP request latency in seconds by method and route.",
                )
                .buckets(LATENCY_BUCKETS.to_vec()),
                &["method", "route"],
            )?,
        )?;

        let requests_in_flight = registered(
            &registry,
            IntGauge::with_opts(Opts::new(
                "rave_json_http_requests_in_flight",
                "HTTP requests currently being served.",
            ))?,
        )?;

        let participation_events_total = registered(
            &registry,
            IntCounterVec::new(
                Opts::new(
                    "rave_json_participation_events_total",
                    "Promotion joins and progress updates by event and outcome.",
                ),
                &["event", "outcome"],
            )?,
        )?;

        Ok(Self {
            registry,
            requests_total,
            request_duration_seconds,
            requests_in_flight,
            participation_events_total,
        })
    }
}

fn registered<C>(registry: &Registry, collector: C) -> prometheus::Result<C>
where
    C: Collector + Clone + 'static,
{
    registry.register(Box::new(collector.clone()))?;

    Ok(collector)
}

fn status_class(status_code: u16) -> &'static str {
    match status_code {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}
