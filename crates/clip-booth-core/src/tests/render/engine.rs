use crate::{
    BoothError, CaptureFormat, EncodedBlob, PCM16_HEADER_LEN, SubmissionForm, SubmissionSource,
    TrimEncodeEngine, TrimSelection, WAV_MIME_TYPE,
    tests::support::{float_blob, hound_read_pcm16, pcm16_to_f32, tone},
};

fn form() -> SubmissionForm {
    SubmissionForm {
        full_name: "Grace Hopper".to_string(),
        email: Some("grace@example.com".to_string()),
        title: "Nanoseconds".to_string(),
        category: "Interview".to_string(),
        description: None,
    }
}

/// WHAT: Render produces a trimmed PCM16 file readable by another decoder
/// WHY: The endpoint stores the attachment as-is
#[test]
fn given_stereo_capture_when_rendering_middle_half_then_pcm16_slice() {
    // Given: 2s of 48 kHz stereo in the capture container
    let format = CaptureFormat {
        sample_rate: 48_000,
        channels: 2,
    };
    let samples = tone(96_000, 2);
    let blob = float_blob(format, &samples);

    // When: Rendering [0.25, 0.75]
    let submission = TrimEncodeEngine::default()
        .render(&blob, TrimSelection::new(0.25, 0.75).unwrap(), form())
        .unwrap();

    // Then: 1s of PCM16 stereo whose samples match the source slice
    assert_eq!(submission.frames, 48_000);
    assert_eq!(submission.duration_ms, 1_000);
    assert_eq!(submission.source, SubmissionSource::Record);
    assert_eq!(
        submission.audio.len(),
        PCM16_HEADER_LEN + 48_000 * 2 * 2
    );

    let (spec, pcm) = hound_read_pcm16(&submission.audio);
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.sample_rate, 48_000);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(pcm.len(), 96_000);

    let source_slice = &samples[24_000 * 2..72_000 * 2];
    for (decoded, original) in pcm.iter().zip(source_slice) {
        assert!((pcm16_to_f32(*decoded) - original).abs() <= 1.0 / 32_767.0 + 1e-6);
    }
}

/// WHAT: Form validation runs before any decoding
/// WHY: A blank required field is reported even for a bad blob
#[test]
fn given_blank_title_and_corrupt_blob_when_rendering_then_missing_field() {
    // Given: A form without a title and an undecodable blob
    let mut form = form();
    form.title = "   ".to_string();
    let blob = EncodedBlob::new(WAV_MIME_TYPE, vec![0u8; 16]);

    // When: Rendering
    let result = TrimEncodeEngine::default().render(&blob, TrimSelection::FULL, form);

    // Then: MissingField names the title
    assert!(matches!(
        result,
        Err(BoothError::MissingField { field: "title", .. })
    ));
}

/// WHAT: Form fields use endpoint names and skip blank optionals
/// WHY: The endpoint treats present-but-empty fields as values
#[test]
fn given_upload_engine_when_rendering_then_fields_carry_source_and_duration() {
    // Given: An upload-tagged engine and a form without a description
    let blob = float_blob(
        CaptureFormat {
            sample_rate: 8_000,
            channels: 1,
        },
        &tone(8_000, 1),
    );
    let mut form = form();
    form.email = Some(String::new());

    // When: Rendering the whole clip
    let submission = TrimEncodeEngine::new(SubmissionSource::Upload)
        .render(&blob, TrimSelection::FULL, form)
        .unwrap();
    let fields = submission.form_fields();

    // Then: Required fields, duration and source present; blanks omitted
    let get = |name: &str| {
        fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value.as_str())
    };
    assert_eq!(get("fullName"), Some("Grace Hopper"));
    assert_eq!(get("title"), Some("Nanoseconds"));
    assert_eq!(get("category"), Some("Interview"));
    assert_eq!(get("durationMs"), Some("1000"));
    assert_eq!(get("source"), Some("upload"));
    assert_eq!(get("email"), None);
    assert_eq!(get("description"), None);
}
