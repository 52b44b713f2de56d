use super::*;

fn entry(time_sec: f64, points: Vec<[f64; 2]>) -> RegionEntry {
    RegionEntry { time_sec, points }
}

fn square() -> Vec<[f64; 2]> {
    vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]]
}

#[test]
fn parses_job_json() {
    let job = ReplaceJob::from_json_str(
        r#"{
            "video": "in.mp4",
            "image": "logo.png",
            "output": "out.mp4",
            "regions": [ { "time_sec": 1.5, "points": [[0,0],[10,0],[10,10],[0,10]] } ]
        }"#,
    )
    .unwrap();
    assert_eq!(job.video, PathBuf::from("in.mp4"));
    let region = job.first_region().unwrap();
    assert_eq!(region.start_time_sec, 1.5);
    assert_eq!(region.quad.corners[2].x, 10.0);
}

#[test]
fn malformed_json_is_validation_error() {
    let err = ReplaceJob::from_json_str("{ \"video\": 3 }").unwrap_err();
    assert!(matches!(err, QuadwarpError::Validation(_)));
}

#[test]
fn empty_regions_rejected() {
    let job = ReplaceJob {
        video: "a".into(),
        image: "b".into(),
        output: "c".into(),
        regions: vec![],
    };
    assert!(matches!(
        job.first_region().unwrap_err(),
        QuadwarpError::Validation(_)
    ));
}

#[test]
fn extra_regions_are_ignored() {
    let job = ReplaceJob {
        video: "a".into(),
        image: "b".into(),
        output: "c".into(),
        regions: vec![entry(0.5, square()), entry(9.0, vec![[1.0, 1.0]])],
    };
    assert_eq!(job.first_region().unwrap().start_time_sec, 0.5);
}

#[test]
fn negative_or_nan_start_rejected() {
    for t in [-0.1, f64::NAN, f64::INFINITY] {
        let err = entry(t, square()).to_region().unwrap_err();
        assert!(matches!(err, QuadwarpError::Validation(_)), "t={t}");
    }
}

#[test]
fn wrong_point_count_rejected() {
    let err = entry(0.0, vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]])
        .to_region()
        .unwrap_err();
    assert!(matches!(err, QuadwarpError::Validation(_)));
}

#[test]
fn missing_job_file_is_error() {
    assert!(ReplaceJob::from_path(Path::new("target/no/such/job.json")).is_err());
}
