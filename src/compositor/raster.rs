use std::sync::Arc;

use crate::assets::PreparedImage;
use crate::foundation::core::{Affine, BezPath, Canvas, FrameRGBA, Rect, Size};
use crate::foundation::error::{MemoireError, MemoireResult};

/// A CPU drawing surface backed by `vello_cpu`.
///
/// Draw calls are recorded into the render context; [`RasterSurface::finish`] rasterizes them and
/// reads the pixels back.
pub struct RasterSurface {
    canvas: Canvas,
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
}

impl RasterSurface {
    pub fn new(canvas: Canvas) -> MemoireResult<Self> {
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| MemoireError::render("surface width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| MemoireError::render("surface height exceeds u16"))?;
        Ok(Self {
            canvas,
            width,
            height,
            ctx: vello_cpu::RenderContext::new(width, height),
        })
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Draw `image` stretched to exactly cover `dest`.
    pub fn draw_stretched(&mut self, image: &PreparedImage, dest: Rect) -> MemoireResult<()> {
        let size = image_size(image);
        let xf = Affine::translate(dest.origin().to_vec2())
            * Affine::scale_non_uniform(dest.width() / size.width, dest.height() / size.height);
        self.draw_image(image, xf)
    }

    /// Draw `image` into `dest`, masked by `clip` (both in surface pixels).
    pub fn draw_clipped(
        &mut self,
        image: &PreparedImage,
        dest: Rect,
        clip: &BezPath,
    ) -> MemoireResult<()> {
        let paint = image_paint(image)?;
        let size = image_size(image);

        // Clip paths are flattened with the current transform.
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.push_clip_layer(&bezpath_to_cpu(clip));

        let xf = Affine::translate(dest.origin().to_vec2())
            * Affine::scale_non_uniform(dest.width() / size.width, dest.height() / size.height);
        self.fill_image(paint, size, xf);

        self.ctx.pop_layer();
        Ok(())
    }

    /// Draw `image` with `transform` mapping its pixel rect onto the surface.
    pub fn draw_image(&mut self, image: &PreparedImage, transform: Affine) -> MemoireResult<()> {
        let paint = image_paint(image)?;
        self.fill_image(paint, image_size(image), transform);
        Ok(())
    }

    /// Rasterize everything drawn so far and read the pixels back (premultiplied RGBA8).
    pub fn finish(mut self) -> FrameRGBA {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }

    fn fill_image(&mut self, paint: vello_cpu::Image, size: Size, transform: Affine) {
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(affine_to_cpu(transform));
        self.ctx.set_paint(paint);
        self.ctx
            .fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, size.width, size.height));
    }
}

fn image_size(image: &PreparedImage) -> Size {
    Size::new(f64::from(image.width), f64::from(image.height))
}

fn image_paint(image: &PreparedImage) -> MemoireResult<vello_cpu::Image> {
    let pixmap = image_premul_bytes_to_pixmap(&image.rgba8_premul, image.width, image.height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: kurbo::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> MemoireResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| MemoireError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| MemoireError::render("image height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(MemoireError::render("image has zero area"));
    }
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(MemoireError::render("prepared image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let pixels: Vec<_> = rgba8_premul
        .chunks_exact(4)
        .map(|px| {
            may_have_opacities |= px[3] != 255;
            vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
        })
        .collect();

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/raster.rs"]
mod tests;
