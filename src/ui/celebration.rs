use gtk4 as gtk;
use gtk4::glib;
use gtk4::prelude::*;

use crate::game::Celebration;

const PARTICLES_PER_BURST: usize = 8;
const PARTICLE_LIFETIME_MS: u64 = 800;
const BURST_STAGGER_MS: u64 = 180;

fn spawn_firework_burst(layer: &gtk::Fixed, x: f64, y: f64) {
    for i in 0..PARTICLES_PER_BURST {
        let color_idx = i % 4;
        let particle = gtk::Label::builder()
            .label("●")
            .css_classes(vec![
                "firework-particle".to_string(),
                format!("dir-{i}"),
                format!("color-{color_idx}"),
            ])
            .build();

        particle.set_can_target(false);
        layer.put(&particle, x, y);

        glib::timeout_add_local_once(std::time::Duration::from_millis(PARTICLE_LIFETIME_MS), {
            let layer_weak = layer.downgrade();
            let particle_weak = particle.downgrade();
            move || {
                if let (Some(layer), Some(particle)) = (layer_weak.upgrade(), particle_weak.upgrade()) {
                    layer.remove(&particle);
                }
            }
        });
    }
}

pub struct Fireworks {
    layer: gtk::Fixed,
    pulses: u64,
}

impl Fireworks {
    pub fn new(layer: gtk::Fixed) -> Self {
        Fireworks { layer, pulses: 0 }
    }
}

impl Celebration for Fireworks {
    fn trigger(&mut self) {
        self.pulses = self.pulses.wrapping_add(1);
        tracing::debug!(pulse = self.pulses, "Celebration");

        let width = f64::from(self.layer.width().max(1));
        let height = f64::from(self.layer.height().max(1));
        let spots = [
            (width * 0.22, height * 0.25),
            (width * 0.78, height * 0.22),
            (width * 0.5, height * 0.55),
        ];

        for (wave, (x, y)) in spots.into_iter().enumerate() {
            let layer_weak = self.layer.downgrade();
            glib::timeout_add_local_once(
                std::time::Duration::from_millis(BURST_STAGGER_MS * wave as u64),
                move || {
                    if let Some(layer) = layer_weak.upgrade() {
                        spawn_firework_burst(&layer, x, y);
                    }
                },
            );
        }
    }
}
