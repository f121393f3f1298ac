/// 待機用の時計
///
/// ポーリングの待機をテストから差し替えられるようにするための抽象。
use std::future::Future;
use std::time::{Duration, Instant};

pub trait Clock: Send + Sync {
    /// 現在時刻
    fn now(&self) -> Instant;

    /// 指定時間だけ待機する
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// tokio のタイマーを使う本番用の時計
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
