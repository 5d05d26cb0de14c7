use std::time::Duration;

/// 帧率统计
///
/// 由调用方喂入每帧耗时，而不是自己读时钟，这样固定步长的循环和测试里
/// 统计结果也是确定的。每累计满 1 秒输出一次平均帧率。
#[derive(Debug, Clone, Default)]
pub struct FpsCounter {
    frame_count: u32,
    accumulated_time: Duration,
    pub current_fps: f32,
}

impl FpsCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一帧；窗口满 1 秒时返回该窗口的平均帧率
    pub fn update(&mut self, delta: Duration) -> Option<f32> {
        self.frame_count += 1;
        self.accumulated_time += delta;

        if self.accumulated_time.as_secs_f32() >= 1.0 {
            self.current_fps = self.frame_count as f32 / self.accumulated_time.as_secs_f32();

            // 重置计数
            self.accumulated_time = Duration::ZERO;
            self.frame_count = 0;

            return Some(self.current_fps);
        }

        None
    }
}
