//! Animated transitions: node position tweens and map opacity fades.

use bevy::prelude::*;
use std::time::Duration;

/// Symmetric cubic in-out easing on `t` in [0, 1].
pub fn ease_cubic_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

/// Carries a node from `from` to `to` over a fixed duration; removed on
/// completion. While present it is the authoritative position source.
#[derive(Component)]
pub struct PositionTween {
    from: Vec2,
    to: Vec2,
    timer: Timer,
}

impl PositionTween {
    pub fn new(from: Vec2, to: Vec2, secs: f32) -> Self {
        Self {
            from,
            to,
            timer: Timer::from_seconds(secs, TimerMode::Once),
        }
    }

    /// Final position this tween is heading to.
    pub fn target(&self) -> Vec2 {
        self.to
    }

    pub fn sample(&self) -> Vec2 {
        if self.timer.finished() {
            return self.to;
        }
        self.from.lerp(self.to, ease_cubic_in_out(self.timer.fraction()))
    }
}

pub fn position_tween_system(
    mut commands: Commands,
    time: Res<Time>,
    mut tweens: Query<(Entity, &mut Transform, &mut PositionTween)>,
) {
    for (entity, mut transform, mut tween) in &mut tweens {
        tween.timer.tick(time.delta());
        let p = tween.sample();
        transform.translation.x = p.x;
        transform.translation.y = p.y;
        if tween.timer.finished() {
            commands.entity(entity).remove::<PositionTween>();
        }
    }
}

/// One opacity channel. The body and outline channels run independent
/// durations when fading out.
pub struct FadeChannel {
    from: f32,
    target: f32,
    timer: Timer,
}

impl Default for FadeChannel {
    fn default() -> Self {
        Self {
            from: 0.0,
            target: 0.0,
            timer: Timer::from_seconds(0.0, TimerMode::Once),
        }
    }
}

impl FadeChannel {
    /// Begin a fade from the current value toward `target` over `secs`.
    pub fn fade_to(&mut self, target: f32, secs: f32) {
        self.from = self.value();
        self.target = target;
        self.timer = Timer::from_seconds(secs, TimerMode::Once);
    }

    pub fn advance(&mut self, delta: Duration) {
        self.timer.tick(delta);
    }

    pub fn value(&self) -> f32 {
        if self.timer.finished() {
            return self.target;
        }
        self.from + (self.target - self.from) * ease_cubic_in_out(self.timer.fraction())
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn duration_secs(&self) -> f32 {
        self.timer.duration().as_secs_f32()
    }
}

/// Opacity of the two map layers, 0 in Force mode and 1 in Map mode.
#[derive(Resource, Default)]
pub struct MapFade {
    pub body: FadeChannel,
    pub outline: FadeChannel,
}

pub fn map_fade_system(time: Res<Time>, mut fade: ResMut<MapFade>) {
    fade.body.advance(time.delta());
    fade.outline.advance(time.delta());
}
