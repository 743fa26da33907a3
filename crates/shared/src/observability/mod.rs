//! 统一可观测性模块
//!
//! 提供 metrics、tracing、logging 的统一初始化和管理。
//! 两个服务通过单一入口点配置可观测性，确保一致的指标命名和日志格式。

pub mod metrics;
pub mod middleware;
pub mod tracing;

use ::tracing::info;
use anyhow::Result;
use serde::Deserialize;

/// 可观测性配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// 服务名称，用于标识追踪和指标的来源
    pub service_name: String,

    /// OpenTelemetry OTLP 端点（如 Jaeger）
    /// 为空时禁用分布式追踪导出
    pub otlp_endpoint: Option<String>,

    /// 是否启动 Prometheus 指标导出
    pub metrics_enabled: bool,

    /// Prometheus 指标导出端口
    pub metrics_port: u16,

    /// 日志级别（如 "info", "debug"）
    pub log_level: String,

    /// 是否启用 JSON 格式日志
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            service_name: "unknown-service".to_string(),
            otlp_endpoint: None,
            metrics_enabled: true,
            metrics_port: 9090,
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl ObservabilityConfig {
    /// 注入服务名（配置文件中通常不单独声明）
    pub fn with_service_name(mut self, service_name: &str) -> Self {
        self.service_name = service_name.to_string();
        self
    }
}

/// 可观测性资源守卫
///
/// 持有各种可观测性资源的生命周期。
/// 当 Guard 被 drop 时，会优雅关闭追踪 provider 并刷新待发送数据。
pub struct ObservabilityGuard {
    _metrics_handle: Option<metrics::MetricsHandle>,
    _tracing_guard: tracing::TracingGuard,
}

impl Drop for ObservabilityGuard {
    fn drop(&mut self) {
        info!("Shutting down observability...");
    }
}

/// 统一初始化可观测性
///
/// 初始化顺序：
/// 1. Tracing（日志和追踪）
/// 2. Metrics（Prometheus 指标，可关闭）
pub async fn init(config: &ObservabilityConfig) -> Result<ObservabilityGuard> {
    let tracing_guard = tracing::init(config)?;

    info!(
        service = %config.service_name,
        metrics_enabled = config.metrics_enabled,
        metrics_port = %config.metrics_port,
        otlp_endpoint = ?config.otlp_endpoint,
        "Observability initialized"
    );

    let metrics_handle = if config.metrics_enabled {
        Some(metrics::init(config).await?)
    } else {
        None
    };

    Ok(ObservabilityGuard {
        _metrics_handle: metrics_handle,
        _tracing_guard: tracing_guard,
    })
}
