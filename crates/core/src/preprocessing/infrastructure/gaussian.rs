/// Sigma implied by a kernel size when no explicit deviation is given.
///
/// `0.3 * ((k - 1) * 0.5 - 1) + 0.8`, the usual zero-sigma convention.
pub fn sigma_for_kernel(kernel_size: usize) -> f64 {
    0.3 * ((kernel_size as f64 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Precompute a normalized 1D Gaussian kernel of the given size.
///
/// `kernel_size` must be odd and >= 1.
pub fn gaussian_kernel_1d(kernel_size: usize) -> Vec<f32> {
    debug_assert!(kernel_size >= 1 && kernel_size % 2 == 1);
    let sigma = sigma_for_kernel(kernel_size);
    let half = (kernel_size / 2) as f64;
    let mut kernel_f64: Vec<f64> = (0..kernel_size)
        .map(|i| {
            let x = i as f64 - half;
            (-x * x / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f64 = kernel_f64.iter().sum();
    for v in &mut kernel_f64 {
        *v /= sum;
    }
    kernel_f64.iter().map(|&v| v as f32).collect()
}

/// Mirrors an out-of-range index back into `0..n` without repeating the
/// edge sample (`dcb|abcd|cba`).
fn reflect_101(i: isize, n: usize) -> usize {
    if n == 1 {
        return 0;
    }
    let n = n as isize;
    let mut i = i;
    while i < 0 || i >= n {
        i = if i < 0 { -i } else { 2 * n - 2 - i };
    }
    i as usize
}

/// Apply a separable Gaussian blur using a pre-computed kernel, reusing `temp`.
pub fn separable_gaussian_blur_with_kernel(
    data: &mut [u8],
    width: usize,
    height: usize,
    channels: usize,
    kernel: &[f32],
    temp: &mut Vec<f32>,
) {
    let kernel_size = kernel.len();
    if kernel_size <= 1 || width == 0 || height == 0 {
        return;
    }
    let half = kernel_size as isize / 2;

    temp.resize(width * height * channels, 0.0);

    // Horizontal pass: data → temp
    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                let mut sum = 0.0f32;
                for (k, &w) in kernel.iter().enumerate() {
                    let sx = reflect_101(x as isize + k as isize - half, width);
                    sum += data[(y * width + sx) * channels + c] as f32 * w;
                }
                temp[(y * width + x) * channels + c] = sum;
            }
        }
    }

    // Vertical pass: temp → data
    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                let mut sum = 0.0f32;
                for (k, &w) in kernel.iter().enumerate() {
                    let sy = reflect_101(y as isize + k as isize - half, height);
                    sum += temp[(sy * width + x) * channels + c] * w;
                }
                data[(y * width + x) * channels + c] = sum.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn blur(data: &mut [u8], width: usize, height: usize, kernel_size: usize) {
        let kernel = gaussian_kernel_1d(kernel_size);
        let mut temp = Vec::new();
        separable_gaussian_blur_with_kernel(data, width, height, 3, &kernel, &mut temp);
    }

    #[test]
    fn test_sigma_for_kernel_five() {
        assert_relative_eq!(sigma_for_kernel(5), 1.1, epsilon = 1e-12);
    }

    #[test]
    fn test_kernel_sums_to_one() {
        let k = gaussian_kernel_1d(5);
        let sum: f32 = k.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_kernel_is_symmetric_and_peaked() {
        let k = gaussian_kernel_1d(5);
        for i in 0..k.len() / 2 {
            assert!((k[i] - k[k.len() - 1 - i]).abs() < 1e-6);
            assert!(k[2] > k[i]);
        }
        assert_relative_eq!(k[2], 0.3696, epsilon = 1e-3);
    }

    #[test]
    fn test_reflect_101() {
        assert_eq!(reflect_101(-1, 5), 1);
        assert_eq!(reflect_101(-2, 5), 2);
        assert_eq!(reflect_101(5, 5), 3);
        assert_eq!(reflect_101(6, 5), 2);
        assert_eq!(reflect_101(3, 5), 3);
        assert_eq!(reflect_101(-2, 2), 0);
        assert_eq!(reflect_101(4, 1), 0);
    }

    #[test]
    fn test_blur_uniform_image_unchanged() {
        let mut data = vec![128u8; 10 * 10 * 3];
        blur(&mut data, 10, 10, 5);
        assert!(data.iter().all(|&v| v == 128));
    }

    #[test]
    fn test_blur_spreads_single_bright_pixel() {
        let mut data = vec![0u8; 10 * 10 * 3];
        let cx = 5 * 10 + 5;
        data[cx * 3..cx * 3 + 3].fill(255);

        blur(&mut data, 10, 10, 5);

        assert!(data[cx * 3] < 255);
        assert!(data[(5 * 10 + 6) * 3] > 0);
        // three pixels away is outside the 5x5 support
        assert_eq!(data[(5 * 10 + 8) * 3], 0);
    }

    #[test]
    fn test_kernel_size_1_is_identity() {
        let mut data: Vec<u8> = (0..75).map(|v| v as u8).collect();
        let original = data.clone();
        blur(&mut data, 5, 5, 1);
        assert_eq!(data, original);
    }

    #[test]
    fn test_blur_handles_images_smaller_than_kernel() {
        let mut data = vec![200u8; 6];
        blur(&mut data, 2, 1, 5);
        assert!(data.iter().all(|&v| v == 200));
    }
}
