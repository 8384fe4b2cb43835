use rand::Rng;

use crate::raster::Raster;

pub const TEST_IMAGE_SIZE: u32 = 64;

pub fn rand_pixel(rng: &mut rand::rngs::ThreadRng) -> [u8; 3] {
    [rng.random::<u8>(), rng.random::<u8>(), rng.random::<u8>()]
}

pub fn gen_random_image(width: u32, height: u32) -> Raster<u8> {
    let mut rng = rand::rng();
    let samples: Vec<u8> = (0..width * height)
        .flat_map(|_| rand_pixel(&mut rng))
        .collect();
    Raster::from_slice(width, height, 3, &samples)
}

/// Smooth diagonal ramp, stable under a small median window.
pub fn gen_gradient_image(size: u32) -> Raster<u8> {
    let mut raster = Raster::<u8>::new(size, size, 3);
    let span = (2 * size - 2).max(1);
    for y in 0..size {
        for x in 0..size {
            let value = ((x + y) * 255 / span) as u8;
            raster
                .pixel_mut(x, y)
                .copy_from_slice(&[value, value / 2, 255 - value]);
        }
    }
    raster
}

/// Flip isolated pixels to black or white on a grid spaced wider than a 3x3 window.
pub fn sprinkle_impulses(raster: &mut Raster<u8>, spacing: u32) {
    let mut rng = rand::rng();
    for y in (1..raster.height()).step_by(spacing as usize) {
        for x in (1..raster.width()).step_by(spacing as usize) {
            let value = if rng.random_bool(0.5) { 0 } else { 255 };
            raster.pixel_mut(x, y).fill(value);
        }
    }
}
