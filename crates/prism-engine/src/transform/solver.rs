use glam::{Mat4, Vec3};

/// How content is mapped onto the surface.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum FitPolicy {
    /// Identity matrix; the viewport alone maps NDC to pixels.
    Identity,
    /// Orthographic projection that keeps unit geometry square on any aspect.
    OrthoFit,
    /// Scale content to fit entirely inside the surface, centered, no cropping.
    CenterInside,
}

/// Orthographic volume produced by [`FitPolicy::OrthoFit`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrthoBounds {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

/// Placement of fitted content in surface pixels (top-left origin).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FitRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

const NEAR: f32 = 3.0;
const FAR: f32 = 7.0;
const EYE: Vec3 = Vec3::new(0.0, 0.0, 3.0);

/// Computes the MVP matrix for a surface/content pair.
///
/// The model matrix is always identity, so the result is `projection * view`.
/// Zero-sized surfaces or content yield the identity matrix.
pub fn solve(
    surface_width: u32,
    surface_height: u32,
    content_width: u32,
    content_height: u32,
    policy: FitPolicy,
) -> Mat4 {
    if surface_width == 0 || surface_height == 0 {
        return Mat4::IDENTITY;
    }

    match policy {
        FitPolicy::Identity => Mat4::IDENTITY,
        FitPolicy::OrthoFit => {
            let b = ortho_bounds(surface_width, surface_height);
            let projection =
                Mat4::orthographic_rh(b.left, b.right, b.bottom, b.top, b.near, b.far);
            let view = Mat4::look_at_rh(EYE, Vec3::ZERO, Vec3::Y);
            projection * view
        }
        FitPolicy::CenterInside => {
            let Some(fit) =
                fit_center_inside(surface_width, surface_height, content_width, content_height)
            else {
                return Mat4::IDENTITY;
            };
            // The textured quad spans the whole NDC square; shrink it to the fit
            // rect. Centering means no translation is needed.
            Mat4::from_scale(Vec3::new(
                fit.width / surface_width as f32,
                fit.height / surface_height as f32,
                1.0,
            ))
        }
    }
}

/// Orthographic bounds for `OrthoFit`: the longer axis spans `[-ratio, ratio]`.
pub fn ortho_bounds(surface_width: u32, surface_height: u32) -> OrthoBounds {
    let w = surface_width.max(1) as f32;
    let h = surface_height.max(1) as f32;
    let ratio = w.max(h) / w.min(h);

    let (left, right, bottom, top) = if surface_width > surface_height {
        (-ratio, ratio, -1.0, 1.0)
    } else {
        (-1.0, 1.0, -ratio, ratio)
    };

    OrthoBounds {
        left,
        right,
        bottom,
        top,
        near: NEAR,
        far: FAR,
    }
}

/// Letterboxes content into the surface, preserving aspect ratio.
///
/// Returns `None` when either size is degenerate.
pub fn fit_center_inside(
    surface_width: u32,
    surface_height: u32,
    content_width: u32,
    content_height: u32,
) -> Option<FitRect> {
    if surface_width == 0 || surface_height == 0 || content_width == 0 || content_height == 0 {
        return None;
    }

    let (sw, sh) = (surface_width as f32, surface_height as f32);
    let (cw, ch) = (content_width as f32, content_height as f32);

    let scale = (sw / cw).min(sh / ch);
    let width = cw * scale;
    let height = ch * scale;

    Some(FitRect {
        x: (sw - width) * 0.5,
        y: (sh - height) * 0.5,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    const EPS: f32 = 1e-5;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < EPS
    }

    // ── idempotence ───────────────────────────────────────────────────────

    #[test]
    fn solve_is_bit_identical_across_calls() {
        let inputs = [
            (1920, 1080, 640, 480, FitPolicy::OrthoFit),
            (1080, 1920, 640, 480, FitPolicy::CenterInside),
            (800, 600, 0, 0, FitPolicy::Identity),
            (333, 777, 1023, 17, FitPolicy::CenterInside),
        ];
        for (w, h, cw, ch, policy) in inputs {
            let a = solve(w, h, cw, ch, policy).to_cols_array();
            let b = solve(w, h, cw, ch, policy).to_cols_array();
            let a_bits: Vec<u32> = a.iter().map(|f| f.to_bits()).collect();
            let b_bits: Vec<u32> = b.iter().map(|f| f.to_bits()).collect();
            assert_eq!(a_bits, b_bits);
        }
    }

    // ── OrthoFit ──────────────────────────────────────────────────────────

    #[test]
    fn ortho_bounds_landscape() {
        let b = ortho_bounds(1920, 1080);
        let ratio = 16.0 / 9.0;
        assert!(approx(b.left, -ratio));
        assert!(approx(b.right, ratio));
        assert_eq!((b.bottom, b.top), (-1.0, 1.0));
        assert_eq!((b.near, b.far), (3.0, 7.0));
    }

    #[test]
    fn ortho_bounds_portrait() {
        let b = ortho_bounds(1080, 1920);
        let ratio = 16.0 / 9.0;
        assert_eq!((b.left, b.right), (-1.0, 1.0));
        assert!(approx(b.bottom, -ratio));
        assert!(approx(b.top, ratio));
    }

    #[test]
    fn ortho_bounds_square_is_unit() {
        let b = ortho_bounds(500, 500);
        assert_eq!((b.left, b.right, b.bottom, b.top), (-1.0, 1.0, -1.0, 1.0));
    }

    #[test]
    fn ortho_fit_maps_bounds_corner_to_ndc_corner() {
        let ratio = 16.0 / 9.0;
        let m = solve(1920, 1080, 0, 0, FitPolicy::OrthoFit);
        let p = m * Vec4::new(ratio, 1.0, 0.0, 1.0);
        assert!(approx(p.x, 1.0));
        assert!(approx(p.y, 1.0));
        // The z = 0 plane sits on the near plane (camera at z = 3, near = 3),
        // which is depth 0 in a 0..1 clip volume.
        assert!(approx(p.z, 0.0));
        assert!(p.z >= 0.0 && p.z <= p.w);
    }

    #[test]
    fn ortho_fit_portrait_keeps_x_unit() {
        let ratio = 16.0 / 9.0;
        let m = solve(1080, 1920, 0, 0, FitPolicy::OrthoFit);
        let p = m * Vec4::new(1.0, ratio, 0.0, 1.0);
        assert!(approx(p.x, 1.0));
        assert!(approx(p.y, 1.0));
    }

    // ── CenterInside ──────────────────────────────────────────────────────

    #[test]
    fn center_inside_letterboxes_tall_content() {
        let fit = fit_center_inside(400, 400, 100, 200).unwrap();
        assert_eq!(fit.width, 200.0);
        assert_eq!(fit.height, 400.0);
        assert_eq!(fit.x, 100.0); // left/right margins
        assert_eq!(fit.y, 0.0); // top/bottom margins
    }

    #[test]
    fn center_inside_matrix_scales_quad_to_fit_rect() {
        let m = solve(400, 400, 100, 200, FitPolicy::CenterInside);
        let right_top = m * Vec4::new(1.0, 1.0, 0.0, 1.0);
        assert!(approx(right_top.x, 0.5));
        assert!(approx(right_top.y, 1.0));
    }

    #[test]
    fn center_inside_upscales_small_wide_content() {
        let fit = fit_center_inside(1000, 500, 100, 20).unwrap();
        assert_eq!(fit.width, 1000.0);
        assert_eq!(fit.height, 200.0);
        assert_eq!(fit.y, 150.0);
    }

    #[test]
    fn degenerate_sizes_yield_identity() {
        assert_eq!(solve(0, 100, 10, 10, FitPolicy::OrthoFit), Mat4::IDENTITY);
        assert_eq!(solve(100, 100, 0, 10, FitPolicy::CenterInside), Mat4::IDENTITY);
        assert!(fit_center_inside(100, 100, 10, 0).is_none());
    }

    #[test]
    fn identity_policy_ignores_sizes() {
        assert_eq!(solve(1920, 1080, 3, 7, FitPolicy::Identity), Mat4::IDENTITY);
    }
}
