use image::{DynamicImage, ImageBuffer, Rgb, RgbImage};

/// (width, height, channels)
pub type Shape = (usize, usize, usize);

/// Channels every decoded image is normalised to.
pub const RGB_CHANNELS: usize = 3;

/// Interleaved, row-major pixel buffer with an owned backing store.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster<T> {
    width: u32,
    height: u32,
    channels: u32,
    buffer: Vec<T>,
}

impl<T> AsRef<[T]> for Raster<T> {
    #[inline]
    fn as_ref(&self) -> &[T] {
        &self.buffer
    }
}

impl<T> AsMut<[T]> for Raster<T> {
    #[inline]
    fn as_mut(&mut self) -> &mut [T] {
        &mut self.buffer
    }
}

impl<T> Raster<T> {
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn channels(&self) -> u32 {
        self.channels
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        (
            self.width as usize,
            self.height as usize,
            self.channels as usize,
        )
    }

    /// Number of samples in one row.
    #[inline]
    pub fn stride(&self) -> usize {
        self.width as usize * self.channels as usize
    }
}

impl<T: Clone> Raster<T> {
    pub fn from_slice(width: u32, height: u32, channels: u32, slice: &[T]) -> Self {
        assert_eq!(
            slice.len(),
            (width * height * channels) as usize,
            "buffers don't match sizes"
        );
        Raster {
            width,
            height,
            channels,
            buffer: slice.to_owned(),
        }
    }

    /// Raster where every pixel holds the same samples.
    pub fn filled(width: u32, height: u32, pixel: &[T]) -> Self {
        let count = (width * height) as usize;
        let mut buffer = Vec::with_capacity(count * pixel.len());
        (0..count).for_each(|_| buffer.extend_from_slice(pixel));
        Raster {
            width,
            height,
            channels: pixel.len() as u32,
            buffer,
        }
    }
}

impl<T: Default + Copy> Raster<T> {
    pub fn new(width: u32, height: u32, channels: u32) -> Self {
        Self {
            width,
            height,
            channels,
            buffer: vec![T::default(); (width * height * channels) as usize],
        }
    }
}

impl Raster<u8> {
    /// Samples of the pixel at (x, y).
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let channels = self.channels as usize;
        let start = (y as usize * self.width as usize + x as usize) * channels;
        &self.buffer[start..start + channels]
    }

    #[inline]
    pub fn pixel_mut(&mut self, x: u32, y: u32) -> &mut [u8] {
        let channels = self.channels as usize;
        let start = (y as usize * self.width as usize + x as usize) * channels;
        &mut self.buffer[start..start + channels]
    }

    pub fn into_rgb_image(self) -> RgbImage {
        assert_eq!(self.channels as usize, RGB_CHANNELS, "raster is not RGB");
        ImageBuffer::<Rgb<u8>, Vec<u8>>::from_raw(self.width, self.height, self.buffer)
            .expect("raster dimensions match its buffer")
    }
}

impl From<RgbImage> for Raster<u8> {
    fn from(value: RgbImage) -> Self {
        let (width, height) = value.dimensions();
        Raster {
            width,
            height,
            channels: RGB_CHANNELS as u32,
            buffer: value.into_raw(),
        }
    }
}

/// Drops alpha and expands grayscale, so every image compares as 3 channels.
impl From<DynamicImage> for Raster<u8> {
    fn from(value: DynamicImage) -> Self {
        value.into_rgb8().into()
    }
}
