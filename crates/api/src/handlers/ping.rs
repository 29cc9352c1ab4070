/// GET /api/ping
pub async fn ping() -> &'static str {
    "ok"
}
