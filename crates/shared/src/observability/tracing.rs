//! 日志与追踪初始化
//!
//! 日志通过 tracing-subscriber 输出（JSON 或可读格式），
//! 配置了 OTLP 端点时额外挂载 OpenTelemetry 导出层。

use anyhow::Result;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource,
    trace::{RandomIdGenerator, Sampler, SdkTracerProvider},
};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use super::ObservabilityConfig;

/// Tracing 资源守卫
///
/// 持有 TracerProvider，在 Drop 时关闭并刷新待发送的 span。
pub struct TracingGuard {
    provider: Option<SdkTracerProvider>,
}

impl Drop for TracingGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take() {
            if let Err(e) = provider.shutdown() {
                eprintln!("Error shutting down tracer provider: {:?}", e);
            }
        }
    }
}

/// 初始化 tracing（日志 + 追踪）
pub fn init(config: &ObservabilityConfig) -> Result<TracingGuard> {
    // RUST_LOG 优先于配置文件
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = if config.json_logs {
        fmt::layer()
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true)
            .with_thread_ids(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .boxed()
    };

    let (otel_layer, provider) = match &config.otlp_endpoint {
        Some(endpoint) => {
            let provider = init_tracer_provider(&config.service_name, endpoint)?;
            let tracer = provider.tracer(config.service_name.clone());
            (
                Some(tracing_opentelemetry::layer().with_tracer(tracer)),
                Some(provider),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(otel_layer)
        .try_init()?;

    Ok(TracingGuard { provider })
}

/// 初始化 OpenTelemetry TracerProvider
fn init_tracer_provider(service_name: &str, endpoint: &str) -> Result<SdkTracerProvider> {
    let resource = Resource::builder()
        .with_service_name(service_name.to_string())
        .build();

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;

    let provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_sampler(Sampler::AlwaysOn)
        .with_id_generator(RandomIdGenerator::default())
        .with_resource(resource)
        .build();

    opentelemetry::global::set_tracer_provider(provider.clone());

    Ok(provider)
}
