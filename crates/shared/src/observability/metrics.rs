//! Prometheus 指标模块
//!
//! 基于 metrics crate 和 metrics-exporter-prometheus 实现指标收集与导出。
//! 指标通过独立的 HTTP 端口暴露，供 Prometheus 抓取。

use anyhow::Result;
use axum::{Router, routing::get};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info};

use super::ObservabilityConfig;

/// Metrics 资源守卫
pub struct MetricsHandle {
    _server_handle: tokio::task::JoinHandle<()>,
}

/// 初始化 Prometheus 指标导出
///
/// 启动一个独立的 HTTP 服务器在指定端口暴露 `/metrics` 端点。
pub async fn init(config: &ObservabilityConfig) -> Result<MetricsHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;


    register_common_metrics(&config.service_name);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.metrics_port));
    let server_handle = start_metrics_server(addr, handle).await?;

    Ok(MetricsHandle {
        _server_handle: server_handle,
    })
}

/// 注册业务指标描述（出现在 /metrics 的 HELP 注释中）
fn register_common_metrics(service_name: &str) {
    metrics::describe_counter!("http_requests_total", "Total number of HTTP requests");
    metrics::describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds"
    );

    metrics::describe_counter!(
        "purchase_notifications_total",
        "Purchase notifications by channel and result code"
    );
    metrics::describe_histogram!(
        "purchase_duration_seconds",
        "Purchase processing duration in seconds"
    );
    metrics::describe_counter!(
        "order_compensations_total",
        "Orders rolled back after a failed profile update"
    );
    metrics::describe_counter!(
        "profile_effects_total",
        "Item effects applied to profiles"
    );
    metrics::describe_counter!(
        "legacy_profile_migrations_total",
        "Legacy profiles processed by the startup migration"
    );

    metrics::counter!("service_starts_total", "service" => service_name.to_string()).increment(1);
}

/// 启动指标 HTTP 服务器
async fn start_metrics_server(
    addr: SocketAddr,
    handle: PrometheusHandle,
) -> Result<tokio::task::JoinHandle<()>> {
    let app = Router::new()
        .route("/metrics", get(move || std::future::ready(handle.render())))
        .route("/health", get(|| async { "OK" }));

    let listener = TcpListener::bind(addr).await?;
    info!("Metrics server listening on {}", addr);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("Metrics server error: {}", e);
        }
    });

    Ok(server_handle)
}

// ============================================================================
// 指标记录函数
// ============================================================================

/// 记录 HTTP 请求
#[inline]
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let status_str = status.to_string();
    metrics::counter!(
        "http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status_str.clone()
    )
    .increment(1);

    metrics::histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status_str
    )
    .record(duration_secs);
}

/// 记录购买通知处理结果
///
/// `result_code` 为 0 表示成功，否则为返回给调用方的错误码
#[inline]
pub fn record_purchase(channel: &str, result_code: i32, duration_secs: f64) {
    metrics::counter!(
        "purchase_notifications_total",
        "channel" => channel.to_string(),
        "code" => result_code.to_string()
    )
    .increment(1);

    metrics::histogram!(
        "purchase_duration_seconds",
        "channel" => channel.to_string()
    )
    .record(duration_secs);
}

/// 记录订单补偿删除
#[inline]
pub fn record_order_compensation(channel: &str, rolled_back: bool) {
    metrics::counter!(
        "order_compensations_total",
        "channel" => channel.to_string(),
        "rolled_back" => rolled_back.to_string()
    )
    .increment(1);
}

/// 记录档案效果应用
#[inline]
pub fn record_profile_effect(schema: &str, effect: &str) {
    metrics::counter!(
        "profile_effects_total",
        "schema" => schema.to_string(),
        "effect" => effect.to_string()
    )
    .increment(1);
}

/// 记录旧版档案迁移结果
#[inline]
pub fn record_legacy_migration(outcome: &str) {
    metrics::counter!(
        "legacy_profile_migrations_total",
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_functions_do_not_panic() {
        // 未安装 recorder 时记录操作为空操作
        record_http_request("POST", "/", 200, 0.01);
        record_purchase("live", 0, 0.02);
        record_purchase("test", 103, 0.02);
        record_order_compensation("live", true);
        record_profile_effect("v2", "add_lives");
        record_legacy_migration("migrated");
    }
}
