#[cfg(test)]
mod compare_scenario_tests {
    use image::{DynamicImage, Rgba, RgbaImage};

    use crate::{
        backend::{ImageBackend, ImageRsBackend},
        compare,
        config::MetricConfig,
        error::ExportError,
        raster::Raster,
        tests::utils::*,
    };

    #[test]
    fn test_identical_files() {
        let dir = tempfile::tempdir().unwrap();
        let (test, ground) = (dir.path().join("test.png"), dir.path().join("ground.bmp"));
        let backend = ImageRsBackend::default();
        let image = gen_random_image(TEST_IMAGE_SIZE, TEST_IMAGE_SIZE);
        backend.encode(&test, &image).unwrap();
        backend.encode(&ground, &image).unwrap();

        let similarity = compare(&backend, &test, &ground).unwrap();
        assert_eq!(similarity.rmse, 0.0);
        assert_eq!(similarity.sre, f64::INFINITY);
        assert_eq!(similarity.psnr, f64::INFINITY);
        assert_eq!(
            similarity.summary_line(false),
            "Root Mean Squared: 0.0, Signal to Reconstruction: inf"
        );
    }

    #[test]
    fn test_alpha_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let (test, ground) = (dir.path().join("test.png"), dir.path().join("ground.png"));
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 0])))
            .save(&test)
            .unwrap();
        let backend = ImageRsBackend::default();
        backend
            .encode(&ground, &Raster::filled(4, 4, &[1u8, 2, 3]))
            .unwrap();

        assert_eq!(compare(&backend, &test, &ground).unwrap().rmse, 0.0);
    }

    #[test]
    fn test_max_value_scales_rmse() {
        let dir = tempfile::tempdir().unwrap();
        let (test, ground) = (dir.path().join("test.png"), dir.path().join("ground.png"));
        let writer = ImageRsBackend::default();
        writer.encode(&test, &Raster::filled(3, 3, &[60u8, 60, 60])).unwrap();
        writer.encode(&ground, &Raster::filled(3, 3, &[50u8, 50, 50])).unwrap();

        let default_rmse = compare(&writer, &test, &ground).unwrap().rmse;
        let byte_scale = ImageRsBackend::new(MetricConfig::new(255.0).unwrap());
        let byte_rmse = compare(&byte_scale, &test, &ground).unwrap().rmse;
        assert!((default_rmse - 10.0 / 4095.0).abs() < 1e-12);
        assert!((byte_rmse - 10.0 / 255.0).abs() < 1e-12);
    }

    #[test]
    fn test_shape_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let (test, ground) = (dir.path().join("test.png"), dir.path().join("ground.png"));
        let backend = ImageRsBackend::default();
        backend.encode(&test, &gen_random_image(8, 8)).unwrap();
        backend.encode(&ground, &gen_random_image(8, 9)).unwrap();

        let err = compare(&backend, &test, &ground).unwrap_err();
        assert!(matches!(
            err,
            ExportError::ShapeMismatch {
                expected: (8, 8),
                found: (8, 9)
            }
        ));
    }

    #[test]
    fn test_undecodable_input() {
        let dir = tempfile::tempdir().unwrap();
        let (test, ground) = (dir.path().join("test.png"), dir.path().join("ground.png"));
        std::fs::write(&test, b"garbage").unwrap();
        ImageRsBackend::default()
            .encode(&ground, &gen_random_image(4, 4))
            .unwrap();

        assert!(compare(&ImageRsBackend::default(), &test, &ground).is_err());
    }
}
