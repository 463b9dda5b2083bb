use std::path::Path;

use crate::shared::constants::MOTION_VIDEO_FOURCC;
use crate::shared::frame::{ChannelOrder, Frame};
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_writer::VideoWriter;

/// Encodes video frames via ffmpeg-next as MPEG-4 Part 2 tagged `mp4v`.
///
/// The encoder input is BGR24, the container-native channel order; frames
/// tagged `Rgb` are swapped back while being copied in.
pub struct FfmpegWriter {
    octx: Option<ffmpeg_next::format::context::Output>,
    encoder: Option<ffmpeg_next::codec::encoder::video::Encoder>,
    scaler: Option<ffmpeg_next::software::scaling::Context>,
    width: u32,
    height: u32,
    fps: i32,
    frame_count: usize,
    video_stream_index: usize,
}

// Safety: FfmpegWriter is only used from a single thread at a time.
// The raw pointers inside ffmpeg types are not shared across threads.
unsafe impl Send for FfmpegWriter {}

impl FfmpegWriter {
    pub fn new() -> Self {
        Self {
            octx: None,
            encoder: None,
            scaler: None,
            width: 0,
            height: 0,
            fps: 0,
            frame_count: 0,
            video_stream_index: 0,
        }
    }

    pub fn frames_written(&self) -> usize {
        self.frame_count
    }

    fn drain_packets(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let (Some(encoder), Some(octx)) = (self.encoder.as_mut(), self.octx.as_mut()) else {
            return Err("FfmpegWriter: not opened".into());
        };
        let ost_time_base = octx
            .stream(self.video_stream_index)
            .ok_or("FfmpegWriter: output stream missing")?
            .time_base();

        let mut encoded = ffmpeg_next::Packet::empty();
        while encoder.receive_packet(&mut encoded).is_ok() {
            encoded.set_stream(self.video_stream_index);
            encoded.rescale_ts(ffmpeg_next::Rational(1, self.fps), ost_time_base);
            encoded.write_interleaved(octx)?;
        }
        Ok(())
    }

    /// Flushes the encoder and writes the container trailer.
    fn finish(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(encoder) = self.encoder.as_mut() {
            encoder.send_eof()?;
        }
        self.drain_packets()?;
        if let Some(octx) = self.octx.as_mut() {
            octx.write_trailer()?;
        }
        Ok(())
    }
}

impl Default for FfmpegWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoWriter for FfmpegWriter {
    fn open(
        &mut self,
        path: &Path,
        metadata: &VideoMetadata,
    ) -> Result<(), Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        let fps = metadata.fps.round() as i32;
        if fps <= 0 {
            return Err(format!("Invalid output frame rate {}", metadata.fps).into());
        }

        let mut octx = ffmpeg_next::format::output(path)?;

        let global_header = octx
            .format()
            .flags()
            .contains(ffmpeg_next::format::Flags::GLOBAL_HEADER);

        let codec = ffmpeg_next::encoder::find(ffmpeg_next::codec::Id::MPEG4)
            .ok_or("MPEG4 encoder not found")?;

        let mut ost = octx.add_stream(Some(codec))?;

        let mut encoder_ctx = ffmpeg_next::codec::context::Context::new_with_codec(codec)
            .encoder()
            .video()?;

        encoder_ctx.set_width(metadata.width);
        encoder_ctx.set_height(metadata.height);
        encoder_ctx.set_format(ffmpeg_next::format::Pixel::YUV420P);
        encoder_ctx.set_time_base(ffmpeg_next::Rational(1, fps));
        encoder_ctx.set_frame_rate(Some(ffmpeg_next::Rational(fps, 1)));

        if global_header {
            encoder_ctx.set_flags(ffmpeg_next::codec::Flags::GLOBAL_HEADER);
        }

        let encoder = encoder_ctx.open_with(ffmpeg_next::Dictionary::new())?;
        ost.set_parameters(&encoder);
        unsafe {
            (*ost.parameters().as_mut_ptr()).codec_tag = u32::from_le_bytes(MOTION_VIDEO_FOURCC);
        }

        octx.write_header()?;

        let scaler = ffmpeg_next::software::scaling::Context::get(
            ffmpeg_next::format::Pixel::BGR24,
            metadata.width,
            metadata.height,
            ffmpeg_next::format::Pixel::YUV420P,
            metadata.width,
            metadata.height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )?;

        self.width = metadata.width;
        self.height = metadata.height;
        self.fps = fps;
        self.video_stream_index = 0;
        self.octx = Some(octx);
        self.encoder = Some(encoder);
        self.scaler = Some(scaler);
        self.frame_count = 0;

        Ok(())
    }

    fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        let (Some(encoder), Some(scaler)) = (self.encoder.as_mut(), self.scaler.as_mut()) else {
            return Err("FfmpegWriter: not opened".into());
        };
        if frame.dimensions() != (self.width, self.height) || frame.channels() != 3 {
            return Err(format!(
                "Frame {} is {}x{}x{}, writer expects {}x{}x3",
                frame.index(),
                frame.width(),
                frame.height(),
                frame.channels(),
                self.width,
                self.height
            )
            .into());
        }

        let mut bgr_frame = ffmpeg_next::util::frame::video::Video::new(
            ffmpeg_next::format::Pixel::BGR24,
            self.width,
            self.height,
        );

        let stride = bgr_frame.stride(0);
        let data = bgr_frame.data_mut(0);
        let src = frame.data();
        let row_bytes = self.width as usize * 3;

        for row in 0..self.height as usize {
            let src_row = &src[row * row_bytes..(row + 1) * row_bytes];
            let dst_row = &mut data[row * stride..row * stride + row_bytes];
            match frame.order() {
                ChannelOrder::Bgr => dst_row.copy_from_slice(src_row),
                ChannelOrder::Rgb => {
                    for (dst, px) in dst_row.chunks_exact_mut(3).zip(src_row.chunks_exact(3)) {
                        dst[0] = px[2];
                        dst[1] = px[1];
                        dst[2] = px[0];
                    }
                }
            }
        }

        let mut yuv_frame = ffmpeg_next::util::frame::video::Video::empty();
        scaler.run(&bgr_frame, &mut yuv_frame)?;
        yuv_frame.set_pts(Some(self.frame_count as i64));

        encoder.send_frame(&yuv_frame)?;
        self.drain_packets()?;

        self.frame_count += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let result = if self.encoder.is_some() {
            self.finish()
        } else {
            Ok(())
        };

        self.octx = None;
        self.encoder = None;
        self.scaler = None;

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::domain::video_reader::VideoReader;
    use crate::video::infrastructure::ffmpeg_reader::FfmpegReader;

    fn metadata(w: u32, h: u32, fps: u32) -> VideoMetadata {
        VideoMetadata::for_output(w, h, fps, 0)
    }

    fn solid_frame(index: usize, w: u32, h: u32, order: ChannelOrder, rgb: [u8; 3]) -> Frame {
        Frame::filled(w, h, order, rgb, index)
    }

    fn probe_stream(path: &Path) -> (u32, u32, ffmpeg_next::Rational, u32) {
        ffmpeg_next::init().unwrap();
        let ictx = ffmpeg_next::format::input(&path).unwrap();
        let stream = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .unwrap();
        let codec_tag = unsafe { (*stream.parameters().as_ptr()).codec_tag };
        let codec_ctx =
            ffmpeg_next::codec::context::Context::from_parameters(stream.parameters()).unwrap();
        let decoder = codec_ctx.decoder().video().unwrap();
        (decoder.width(), decoder.height(), stream.rate(), codec_tag)
    }

    #[test]
    fn test_write_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mp4");

        let mut writer = FfmpegWriter::new();
        writer.open(&path, &metadata(160, 120, 15)).unwrap();
        for i in 0..3 {
            writer
                .write(&solid_frame(i, 160, 120, ChannelOrder::Bgr, [128, 128, 128]))
                .unwrap();
        }
        assert_eq!(writer.frames_written(), 3);
        writer.close().unwrap();

        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_output_has_resolution_rate_and_mp4v_tag() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mp4");

        let mut writer = FfmpegWriter::new();
        writer.open(&path, &metadata(160, 120, 15)).unwrap();
        writer
            .write(&solid_frame(0, 160, 120, ChannelOrder::Bgr, [0, 0, 0]))
            .unwrap();
        writer.close().unwrap();

        let (w, h, rate, tag) = probe_stream(&path);
        assert_eq!((w, h), (160, 120));
        assert_eq!(rate.numerator() as f64 / rate.denominator() as f64, 15.0);
        assert_eq!(tag, u32::from_le_bytes(*b"mp4v"));
    }

    #[test]
    fn test_write_without_open_returns_error() {
        let mut writer = FfmpegWriter::new();
        let result = writer.write(&solid_frame(0, 160, 120, ChannelOrder::Bgr, [0, 0, 0]));
        assert!(result.is_err());
    }

    #[test]
    fn test_write_rejects_mismatched_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mp4");

        let mut writer = FfmpegWriter::new();
        writer.open(&path, &metadata(160, 120, 15)).unwrap();
        let result = writer.write(&solid_frame(0, 80, 60, ChannelOrder::Bgr, [0, 0, 0]));
        assert!(result.is_err());
        writer.close().unwrap();
    }

    #[test]
    fn test_open_rejects_zero_rate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mp4");
        let mut writer = FfmpegWriter::new();
        assert!(writer.open(&path, &metadata(160, 120, 0)).is_err());
    }

    #[test]
    fn test_close_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mp4");

        let mut writer = FfmpegWriter::new();
        writer.open(&path, &metadata(160, 120, 15)).unwrap();
        writer
            .write(&solid_frame(0, 160, 120, ChannelOrder::Bgr, [128, 128, 128]))
            .unwrap();
        writer.close().unwrap();
        writer.close().unwrap();
    }

    #[test]
    fn test_rgb_frames_are_written_in_native_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("red.mp4");

        let mut writer = FfmpegWriter::new();
        writer.open(&path, &metadata(160, 120, 15)).unwrap();
        for i in 0..3 {
            writer
                .write(&solid_frame(i, 160, 120, ChannelOrder::Rgb, [255, 0, 0]))
                .unwrap();
        }
        writer.close().unwrap();

        let mut reader = FfmpegReader::new();
        reader.open(&path).unwrap();
        let frame = reader.frames().next().unwrap().unwrap();
        assert_eq!(frame.order(), ChannelOrder::Bgr);

        // Lossy codec: compare channel means, red must dominate blue
        let (mut blue, mut red) = (0u64, 0u64);
        for px in frame.data().chunks_exact(3) {
            blue += px[0] as u64;
            red += px[2] as u64;
        }
        assert!(red > blue * 2, "red={red} blue={blue}");
    }

    #[test]
    fn test_reopen_overwrites_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mp4");

        for count in [5usize, 2] {
            let mut writer = FfmpegWriter::new();
            writer.open(&path, &metadata(160, 120, 15)).unwrap();
            for i in 0..count {
                writer
                    .write(&solid_frame(i, 160, 120, ChannelOrder::Bgr, [90, 90, 90]))
                    .unwrap();
            }
            writer.close().unwrap();
        }

        let mut reader = FfmpegReader::new();
        reader.open(&path).unwrap();
        assert_eq!(reader.frames().count(), 2);
    }
}
