use ndarray::ArrayView3;

/// Bytes per pixel of every patch returned by [`PixelBuffer::read_rgba`].
pub const RGBA_CHANNELS: usize = 4;

/// A pixel-backed surface that can be queried for its size and read back
/// as RGBA.
///
/// The frame handed to the detector and the buffer patches are cut from
/// are usually the same [`Frame`], but callers that keep a separate canvas
/// (e.g. a scaled copy) can supply their own implementation.
pub trait PixelBuffer {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Reads a `width × height` rectangle whose top-left corner is `(x, y)`.
    ///
    /// Always returns `width * height * 4` bytes. Pixels that fall outside
    /// the buffer are transparent black.
    fn read_rgba(&self, x: i32, y: i32, width: u32, height: u32) -> Vec<u8>;
}

/// A single video/image frame: contiguous RGB(A) bytes in row-major order.
///
/// Format conversion happens at I/O boundaries only; the domain layer
/// treats pixel data as opaque.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    /// A zero-sized frame, the state of a canvas nothing has been drawn to yet.
    pub fn empty() -> Self {
        Self::new(Vec::new(), 0, 0, RGBA_CHANNELS as u8, 0)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }

    /// Writes the pixel at `(x, y)` as RGBA into `out`.
    ///
    /// Grayscale is replicated across RGB; missing alpha is opaque.
    fn write_rgba_pixel(&self, x: usize, y: usize, out: &mut [u8]) {
        let channels = self.channels as usize;
        let offset = (y * self.width as usize + x) * channels;
        let px = &self.data[offset..offset + channels];
        match channels {
            1 | 2 => {
                out[..3].fill(px[0]);
                out[3] = if channels == 2 { px[1] } else { u8::MAX };
            }
            3 => {
                out[..3].copy_from_slice(px);
                out[3] = u8::MAX;
            }
            _ => out.copy_from_slice(&px[..RGBA_CHANNELS]),
        }
    }
}

impl PixelBuffer for Frame {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn read_rgba(&self, x: i32, y: i32, width: u32, height: u32) -> Vec<u8> {
        let out_w = width as usize;
        let mut out = vec![0u8; out_w * height as usize * RGBA_CHANNELS];

        // Intersect the requested rectangle with the frame; the rest stays zero.
        let x0 = i64::from(x).max(0);
        let y0 = i64::from(y).max(0);
        let x1 = (i64::from(x) + i64::from(width)).min(i64::from(self.width));
        let y1 = (i64::from(y) + i64::from(height)).min(i64::from(self.height));
        if x0 >= x1 || y0 >= y1 {
            return out;
        }

        for sy in y0..y1 {
            let row = (sy - i64::from(y)) as usize;
            for sx in x0..x1 {
                let col = (sx - i64::from(x)) as usize;
                let dst = (row * out_w + col) * RGBA_CHANNELS;
                self.write_rgba_pixel(
                    sx as usize,
                    sy as usize,
                    &mut out[dst..dst + RGBA_CHANNELS],
                );
            }
        }
        out
    }
}
