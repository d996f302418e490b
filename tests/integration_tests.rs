use image::{ImageBuffer, Rgb, RgbImage, Rgba};
use pixel_hide::{
    cli::{DecodeArgs, EncodeArgs, InspectArgs},
    handler::{handle_decode, handle_encode, handle_inspect},
};
use rand::RngCore;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// 一个辅助函数，用于创建一个带有随机像素的 RGB 测试图像
fn create_test_image(path: &Path, width: u32, height: u32) -> RgbImage {
    let mut raw_pixels = vec![0u8; (width * height * 3) as usize];
    rand::rng().fill_bytes(&mut raw_pixels);

    let img_buf: RgbImage =
        ImageBuffer::from_raw(width, height, raw_pixels).expect("Buffer size must match.");
    img_buf.save(path).expect("Failed to create test image.");
    img_buf
}

/// 验证从隐藏到恢复的完整流程
#[test]
fn test_handle_encode_and_decode_integration() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let carrier_path = dir.path().join("carrier.png");
    let payload_path = dir.path().join("payload.png");
    let encoded_path = dir.path().join("encoded.png");
    let decoded_path = dir.path().join("decoded.png");

    let carrier = create_test_image(&carrier_path, 64, 48);
    let payload = create_test_image(&payload_path, 20, 15);

    // 2. 测试 handle_encode
    let written = handle_encode(EncodeArgs {
        carrier: carrier_path.clone(),
        payload: payload_path.clone(),
        output: Some(encoded_path.clone()),
        force: false,
    })?;
    assert_eq!(written, encoded_path);
    assert!(encoded_path.exists(), "Encoded image should be created.");

    // 载体可见部分只在低 4 位发生变化
    let encoded = image::open(&encoded_path)?.to_rgb8();
    assert_eq!(encoded.dimensions(), carrier.dimensions());
    for (x, y, pixel) in encoded.enumerate_pixels().skip(1) {
        let original = carrier.get_pixel(x, y);
        for (a, b) in pixel.0.iter().zip(original.0.iter()) {
            assert_eq!(a & 0xF0, b & 0xF0, "high nibble changed at ({x}, {y})");
        }
    }

    // 3. 测试 handle_decode
    handle_decode(DecodeArgs {
        image: encoded_path.clone(),
        output: Some(decoded_path.clone()),
        force: false,
    })?;
    assert!(decoded_path.exists(), "Decoded image should be created.");

    // 4. 验证结果
    let decoded = image::open(&decoded_path)?.to_rgb8();
    assert_eq!(
        decoded, payload,
        "Decoded image must match the original payload."
    );

    Ok(())
}

/// 验证无论给出什么扩展名，输出都以 .png 保存
#[test]
fn test_output_extension_is_forced_to_png() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let carrier_path = dir.path().join("carrier.png");
    let payload_path = dir.path().join("payload.png");

    create_test_image(&carrier_path, 16, 16);
    create_test_image(&payload_path, 3, 3);

    let written = handle_encode(EncodeArgs {
        carrier: carrier_path,
        payload: payload_path,
        output: Some(dir.path().join("result.jpg")),
        force: false,
    })?;

    assert_eq!(written, dir.path().join("result.png"));
    assert!(written.exists());
    assert!(!dir.path().join("result.jpg").exists());
    assert_eq!(
        image::ImageFormat::from_path(&written)?,
        image::ImageFormat::Png
    );

    let recovered = handle_decode(DecodeArgs {
        image: written,
        output: Some(dir.path().join("recovered.bmp")),
        force: false,
    })?;
    assert_eq!(recovered, dir.path().join("recovered.png"));

    Ok(())
}

/// 验证带 alpha 通道的输入会被规整为 RGB
#[test]
fn test_rgba_inputs_are_normalized() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let carrier_path = dir.path().join("carrier.png");
    let payload_path = dir.path().join("payload.png");
    let encoded_path = dir.path().join("encoded.png");
    let decoded_path = dir.path().join("decoded.png");

    ImageBuffer::from_pixel(12, 12, Rgba([90u8, 160, 30, 128])).save(&carrier_path)?;
    ImageBuffer::from_pixel(2, 3, Rgba([200u8, 100, 50, 7])).save(&payload_path)?;

    handle_encode(EncodeArgs {
        carrier: carrier_path,
        payload: payload_path,
        output: Some(encoded_path.clone()),
        force: false,
    })?;
    handle_decode(DecodeArgs {
        image: encoded_path,
        output: Some(decoded_path.clone()),
        force: false,
    })?;

    let decoded = image::open(&decoded_path)?.to_rgb8();
    assert_eq!(decoded.dimensions(), (2, 3));
    assert!(decoded.pixels().all(|p| *p == Rgb([200, 100, 50])));

    Ok(())
}

/// 验证覆盖保护机制以及 `--force` 标志是否按预期工作
#[test]
fn test_overwrite_protection_and_force_flag() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let carrier_path = dir.path().join("carrier.png");
    let payload_path = dir.path().join("payload.png");
    let dest_path = dir.path().join("dest.png");

    create_test_image(&carrier_path, 30, 30);
    create_test_image(&payload_path, 4, 4);

    // 2. 场景一：测试覆盖保护
    fs::write(&dest_path, "this is a dummy file to be overwritten")?;

    let result = handle_encode(EncodeArgs {
        carrier: carrier_path.clone(),
        payload: payload_path.clone(),
        output: Some(dest_path.clone()),
        force: false,
    });
    assert!(result.is_err(), "Execution should fail without --force when file exists.");
    if let Err(e) = result {
        assert!(e.to_string().contains("Output file already exists"));
    }

    // 3. 场景二：测试强制覆盖
    let result = handle_encode(EncodeArgs {
        carrier: carrier_path,
        payload: payload_path,
        output: Some(dest_path.clone()),
        force: true,
    });
    assert!(result.is_ok(), "Execution should succeed with --force when file exists.");

    let dummy_content = fs::read(&dest_path)?;
    assert_ne!(dummy_content, b"this is a dummy file to be overwritten");

    Ok(())
}

/// 验证空间不足时的错误处理，且不会写出任何文件
#[test]
fn test_handle_encode_not_enough_space() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let carrier_path = dir.path().join("small.png");
    let payload_path = dir.path().join("large.png");
    let dest_path = dir.path().join("dest.png");

    // 10x10 载体可承载 99 × 12 = 1188 位，8x8 隐藏图像需要 1536 位
    create_test_image(&carrier_path, 10, 10);
    create_test_image(&payload_path, 8, 8);

    let result = handle_encode(EncodeArgs {
        carrier: carrier_path,
        payload: payload_path,
        output: Some(dest_path.clone()),
        force: false,
    });

    assert!(result.is_err());
    if let Err(e) = result {
        assert!(format!("{e:#}").contains("payload too large for carrier"));
    }
    assert!(!dest_path.exists(), "No output should be written on failure.");

    Ok(())
}

/// 验证头部声明的尺寸超过载体容量时，解码失败且不写出文件
#[test]
fn test_handle_decode_truncated_carrier() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("plain.png");
    let dest_path = dir.path().join("out.png");

    // (0,0) 为白色时，头部声明 4095x4095，远超 5x5 载体
    ImageBuffer::from_pixel(5, 5, Rgb([255u8, 255, 255])).save(&image_path)?;

    let result = handle_decode(DecodeArgs {
        image: image_path,
        output: Some(dest_path.clone()),
        force: false,
    });

    assert!(result.is_err());
    if let Err(e) = result {
        assert!(format!("{e:#}").contains("corrupt or undersized carrier"));
    }
    assert!(!dest_path.exists());

    Ok(())
}

/// 验证 inspect 报告的容量与头部信息
#[test]
fn test_handle_inspect_reports_capacity() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let carrier_path = dir.path().join("carrier.png");
    let payload_path = dir.path().join("payload.png");
    let encoded_path = dir.path().join("encoded.png");

    create_test_image(&carrier_path, 10, 10);
    create_test_image(&payload_path, 6, 5);

    handle_encode(EncodeArgs {
        carrier: carrier_path,
        payload: payload_path,
        output: Some(encoded_path.clone()),
        force: false,
    })?;

    let report = handle_inspect(InspectArgs {
        image: encoded_path,
    })?;
    assert_eq!((report.width, report.height), (10, 10));
    assert_eq!(report.capacity_bits, 1188);
    assert_eq!(report.max_square_side, 7);
    let claimed = report.claimed.expect("Non-empty image always has a header.");
    assert_eq!((claimed.width(), claimed.height()), (6, 5));
    assert!(report.claim_fits);

    Ok(())
}

/// 验证头部声明空尺寸 (如全黑图像) 时给出明确错误，且不写出文件
#[test]
fn test_handle_decode_empty_header_claim() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("black.png");
    let dest_path = dir.path().join("out.png");

    // (0,0) 为黑色时，头部声明 0x0
    ImageBuffer::from_pixel(8, 8, Rgb([0u8, 0, 0])).save(&image_path)?;

    let result = handle_decode(DecodeArgs {
        image: image_path,
        output: Some(dest_path.clone()),
        force: false,
    });

    assert!(result.is_err());
    if let Err(e) = result {
        let message = format!("{e:#}");
        assert!(message.contains("claims an empty 0x0 payload"), "{message}");
        assert!(!message.contains("Unable to write"), "{message}");
    }
    assert!(!dest_path.exists(), "No output should be written for an empty claim.");

    Ok(())
}
