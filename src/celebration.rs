use rand::seq::SliceRandom;
use rand::Rng;

const SYMBOLS: [char; 6] = ['*', '+', '✦', '✧', '•', '❤'];
const CHEERS: [&str; 4] = ["SOLVED!", "JUST MARRIED!", "ALL FOUND!", "I DO!"];
const GRAVITY: f64 = 12.0;

/// One piece of confetti, or one letter of the banner.
#[derive(Debug, Clone)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub color_index: usize,
    /// banner letters fly to a fixed spot and stay there
    pub target: Option<(f64, f64)>,
}

impl Particle {
    fn step(&mut self, dt: f64) {
        match self.target {
            Some((tx, ty)) => {
                // close a fixed share of the remaining distance each step
                let pull = (dt * 6.0).min(1.0);
                self.x += (tx - self.x) * pull;
                self.y += (ty - self.y) * pull;
            }
            None => {
                self.x += self.vel_x * dt;
                self.y += self.vel_y * dt;
                self.vel_y += GRAVITY * dt;
            }
        }
    }
}

/// Completion animation, advanced by the UI tick.
#[derive(Debug, Default)]
pub struct Celebration {
    pub particles: Vec<Particle>,
    pub banner: String,
    elapsed: f64,
    duration: f64,
    width: f64,
    height: f64,
}

impl Celebration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.elapsed < self.duration
    }

    pub fn start(&mut self, width: u16, height: u16) {
        self.start_with(width, height, &mut rand::thread_rng());
    }

    pub fn start_with<R: Rng>(&mut self, width: u16, height: u16, rng: &mut R) {
        self.width = width as f64;
        self.height = height as f64;
        self.elapsed = 0.0;
        self.duration = 3.0;
        self.particles.clear();

        let cx = self.width / 2.0;
        let cy = self.height / 2.0;

        self.banner = CHEERS.choose(rng).unwrap_or(&CHEERS[0]).to_string();
        let left = cx - self.banner.chars().count() as f64;
        for (i, ch) in self.banner.chars().enumerate().filter(|(_, c)| *c != ' ') {
            self.particles.push(Particle {
                x: cx + rng.gen_range(-8.0..8.0),
                y: cy + rng.gen_range(-4.0..4.0),
                vel_x: 0.0,
                vel_y: 0.0,
                symbol: ch,
                color_index: rng.gen_range(0..7),
                target: Some((left + i as f64 * 2.0, cy - 2.0)),
            });
        }

        for _ in 0..30 {
            self.particles.push(Particle {
                x: cx + rng.gen_range(-12.0..12.0),
                y: cy + rng.gen_range(-3.0..3.0),
                vel_x: rng.gen_range(-4.0..4.0),
                vel_y: rng.gen_range(-6.0..-1.0),
                symbol: *SYMBOLS.choose(rng).unwrap_or(&'*'),
                color_index: rng.gen_range(0..7),
                target: None,
            });
        }
    }

    /// Advance by `dt` seconds. Confetti that leaves the screen is dropped.
    pub fn update(&mut self, dt: f64) {
        if !self.is_active() {
            return;
        }
        self.elapsed += dt;
        if !self.is_active() {
            self.particles.clear();
            return;
        }

        let (w, h) = (self.width, self.height);
        self.particles.retain_mut(|p| {
            p.step(dt);
            p.target.is_some() || (p.y <= h + 2.0 && p.x >= -2.0 && p.x <= w + 2.0)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn started() -> Celebration {
        let mut c = Celebration::new();
        c.start_with(80, 24, &mut StdRng::seed_from_u64(7));
        c
    }

    #[test]
    fn inactive_until_started() {
        let c = Celebration::new();
        assert!(!c.is_active());
        assert!(c.particles.is_empty());
    }

    #[test]
    fn start_spawns_banner_and_confetti() {
        let c = started();
        assert!(c.is_active());
        assert!(CHEERS.contains(&c.banner.as_str()));
        let letters = c.particles.iter().filter(|p| p.target.is_some()).count();
        assert_eq!(letters, c.banner.chars().filter(|ch| *ch != ' ').count());
        assert_eq!(c.particles.len() - letters, 30);
    }

    #[test]
    fn banner_letters_settle_on_target() {
        let mut c = started();
        for _ in 0..25 {
            c.update(0.1);
        }
        for p in c.particles.iter().filter(|p| p.target.is_some()) {
            let (tx, ty) = p.target.unwrap();
            assert!((p.x - tx).abs() < 0.5 && (p.y - ty).abs() < 0.5);
        }
    }

    #[test]
    fn confetti_falls_and_leaves() {
        let mut c = started();
        let before = c.particles.iter().filter(|p| p.target.is_none()).count();
        c.particles.push(Particle {
            x: 500.0,
            y: 0.0,
            vel_x: 0.0,
            vel_y: 0.0,
            symbol: '*',
            color_index: 0,
            target: None,
        });
        c.update(0.1);
        assert!(c.particles.iter().filter(|p| p.target.is_none()).count() <= before);
    }

    #[test]
    fn ends_after_duration() {
        let mut c = started();
        for _ in 0..31 {
            c.update(0.1);
        }
        assert!(!c.is_active());
        assert!(c.particles.is_empty());
    }
}
