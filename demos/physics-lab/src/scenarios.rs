use lab_engine::{ScenarioRegistry, Simulation};

use crate::sims::collisions::Collisions;
use crate::sims::diffraction::Diffraction;
use crate::sims::free_fall::FreeFall;
use crate::sims::inclined_plane::InclinedPlane;
use crate::sims::pendulum::Pendulum;
use crate::sims::projectile::Projectile;
use crate::sims::spring::Spring;
use crate::sims::standing_wave::StandingWave;
use crate::sims::wave_interference::WaveInterference;

fn boxed<S: Simulation + 'static>(sim: S) -> Box<dyn Simulation> {
    Box::new(sim)
}

/// Every scenario of the lab, in selector order.
pub fn registry() -> ScenarioRegistry {
    let mut registry = ScenarioRegistry::new();
    registry
        .register("free-fall", "自由落下", || boxed(FreeFall::new()))
        .register("projectile", "放物運動", || boxed(Projectile::new()))
        .register("pendulum", "単振り子", || boxed(Pendulum::new()))
        .register("spring", "ばね振り子", || boxed(Spring::new()))
        .register("inclined-plane", "斜面", || boxed(InclinedPlane::new()))
        .register("collisions", "弾性衝突", || boxed(Collisions::new()))
        .register("wave-interference", "波の干渉", || boxed(WaveInterference::new()))
        .register("diffraction", "回折", || boxed(Diffraction::new()))
        .register("standing-wave", "定常波", || boxed(StandingWave::new()));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use lab_engine::{FrameStatus, HostDriver, LabConfig, Theme};

    fn channel_gap(a: [u8; 4], b: [u8; 4]) -> i32 {
        (0..3).map(|i| (a[i] as i32 - b[i] as i32).abs()).sum::<i32>() / 3
    }

    #[test]
    fn every_scenario_constructs_and_runs() {
        let registry = registry();
        assert_eq!(registry.len(), 9);
        let ids: Vec<&str> = registry.ids().collect();
        let mut driver = HostDriver::new(registry, LabConfig::default());
        for id in ids {
            driver.select(id).unwrap();
            assert_eq!(driver.frame(), FrameStatus::Paused, "{}", id);
            assert!(driver.toggle_start().unwrap());
            for _ in 0..120 {
                assert_eq!(driver.frame(), FrameStatus::Running, "{}", id);
            }
            assert!(driver.display().iter().all(|d| d.is_finite()), "{}", id);
            assert!(!driver.sliders().is_empty(), "{}", id);
        }
    }

    #[test]
    fn every_scenario_resets_idempotently() {
        let registry = registry();
        let ids: Vec<&str> = registry.ids().collect();
        let mut driver = HostDriver::new(registry, LabConfig::default());
        for id in ids {
            driver.select(id).unwrap();
            driver.toggle_start().unwrap();
            for _ in 0..30 {
                driver.frame();
            }
            driver.reset().unwrap();
            let first: Vec<String> = driver.display().iter().map(|d| d.value.clone()).collect();
            driver.reset().unwrap();
            let second: Vec<String> = driver.display().iter().map(|d| d.value.clone()).collect();
            assert_eq!(first, second, "{}", id);
            assert_eq!(driver.active().unwrap().time(), 0.0);
        }
    }

    #[test]
    fn unknown_parameter_ids_are_ignored_everywhere() {
        let registry = registry();
        let ids: Vec<&str> = registry.ids().collect();
        let mut driver = HostDriver::new(registry, LabConfig::default());
        for id in ids {
            driver.select(id).unwrap();
            let before: Vec<f32> = driver.sliders().iter().map(|s| s.value).collect();
            assert_eq!(driver.slider_input("noSuchParameter", "1"), None);
            let after: Vec<f32> = driver.sliders().iter().map(|s| s.value).collect();
            assert_eq!(before, after);
        }
    }

    #[test]
    fn labels_read_on_both_themes() {
        let registry = registry();
        let ids: Vec<&str> = registry.ids().collect();
        let mut driver = HostDriver::new(registry, LabConfig::default());
        for theme in [Theme::Light, Theme::Dark] {
            driver.set_theme(theme);
            let bg = theme.background().to_rgba8();
            for id in &ids {
                driver.select(id).unwrap();
                driver.frame();
                assert_eq!(driver.canvas().ink(), theme.foreground(), "{}", id);
                for label in driver.canvas().labels() {
                    let gap = channel_gap(label.color, bg);
                    assert!(gap >= 90, "{} on {}: '{}' {:?} vs {:?}", id, theme, label.text, label.color, bg);
                }
            }
        }
    }

    #[test]
    fn unusable_resize_keeps_the_field_scenarios_alive() {
        let mut driver = HostDriver::new(registry(), LabConfig::default());
        for id in ["wave-interference", "diffraction"] {
            driver.select(id).unwrap();
            driver.toggle_start().unwrap();
            assert!(!driver.resize(lab_engine::SurfaceSize::new(f32::INFINITY, 500.0)));
            assert!(!driver.resize(lab_engine::SurfaceSize::new(1e12, 1e12)));
            assert_eq!(driver.frame(), FrameStatus::Running, "{}", id);
            assert!(driver.canvas().field_image().is_some(), "{}", id);
        }
    }
}
