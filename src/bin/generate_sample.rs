use serde::Serialize;

const OUTPUT_PATH: &str = "sample_telemetry.csv";

const SAMPLE_RATE_HZ: f64 = 50.0;
const DURATION_S: f64 = 14.0;
const MASS_KG: f64 = 1200.0;
const GRAVITY: f64 = 9.81;

/// Resting ride height of the hover suspension (m).
const RIDE_HEIGHT: f64 = 0.55;
/// Beyond this height the ground raycast misses and the logger records -1.
const RAYCAST_RANGE: f64 = 10.0;
/// When the vehicle crosses the ramp edge and the hover solver overshoots.
const RAMP_TIME: f64 = 8.0;

/// One CSV row, in the column order the vehicle logger uses.
#[derive(Serialize)]
struct SampleRow {
    t: f64,
    dt: f64,
    grounded: u8,
    altitude: f64,
    pitch_deg: f64,
    speed: f64,
    h_speed: f64,
    v_vel: f64,
    hover_mag: f64,
    mass: f64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let dt = 1.0 / SAMPLE_RATE_HZ;
    let n = (DURATION_S * SAMPLE_RATE_HZ) as usize;
    let weight = MASS_KG * GRAVITY;

    let mut writer = csv::Writer::from_path(OUTPUT_PATH).expect("Failed to create output file");

    // Scenario: the vehicle accelerates over rolling ground, clips a ramp
    // edge at RAMP_TIME where the hover solver overshoots (force spike →
    // launch), flies a ballistic arc high enough for the ground raycast to
    // miss, and lands again.
    let mut height = RIDE_HEIGHT;
    let mut v_vel = 0.0_f64;
    let mut grounded = true;
    let mut launched = false;

    for i in 0..n {
        let t = i as f64 * dt;

        let mut hover_mag = weight + rng.gauss(0.0, 0.02 * weight);

        if grounded && !launched && t >= RAMP_TIME {
            hover_mag = 6.0 * weight + rng.gauss(0.0, 0.05 * weight);
            v_vel += 16.0;
            grounded = false;
            launched = true;
        } else if grounded {
            v_vel = rng.gauss(0.0, 0.2);
            height = RIDE_HEIGHT + rng.gauss(0.0, 0.03);
        } else {
            v_vel -= GRAVITY * dt;
            height += v_vel * dt;
            if height <= RIDE_HEIGHT {
                height = RIDE_HEIGHT;
                v_vel = 0.0;
                grounded = true;
            }
            // Airborne: the hover raycast finds nothing to push against.
            hover_mag = rng.gauss(0.0, 0.005 * weight).abs();
        }

        let altitude = if height > RAYCAST_RANGE { -1.0 } else { height };

        let h_speed = (t * 2.5).min(22.0) + rng.gauss(0.0, 0.15);
        let speed = (h_speed * h_speed + v_vel * v_vel).sqrt();

        let pitch_deg = if grounded {
            rng.gauss(0.0, 1.5)
        } else {
            8.0 + rng.gauss(0.0, 2.0)
        };

        writer
            .serialize(SampleRow {
                t,
                dt,
                grounded: grounded as u8,
                altitude,
                pitch_deg,
                speed,
                h_speed,
                v_vel,
                hover_mag,
                mass: MASS_KG,
            })
            .expect("Failed to write row");
    }

    writer.flush().expect("Failed to flush output file");

    println!("Wrote {n} samples ({DURATION_S}s at {SAMPLE_RATE_HZ} Hz) to {OUTPUT_PATH}");
}
