// Selection and version-probing logic over fabricated enumeration
// snapshots; no OpenCL runtime is touched.

use cl_probe::{
    ClVersion, DeviceClass, DeviceReport, PlatformReport, SelectionPolicy, min_version_available,
    pick,
};
use std::ptr;

fn gpu(name: &str, version: &str, compute_units: u32) -> DeviceReport {
    DeviceReport {
        id: ptr::null_mut(),
        class: DeviceClass::Gpu,
        vendor: "Acme".into(),
        name: name.into(),
        version: version.into(),
        max_compute_units: compute_units,
        max_work_group_size: 256,
    }
}

fn platform(version: &str, devices: Vec<DeviceReport>) -> PlatformReport {
    PlatformReport {
        version: version.into(),
        devices,
    }
}

#[test]
fn empty_enumeration_selects_nothing() {
    assert!(pick(&[], SelectionPolicy::FirstFound).is_none());
    assert!(pick(&[], SelectionPolicy::MostComputeUnits).is_none());

    // A platform that failed device enumeration shows up with no devices.
    let reports = [platform("OpenCL 1.2 Acme", vec![])];
    assert!(pick(&reports, SelectionPolicy::FirstFound).is_none());
}

#[test]
fn first_found_follows_flattened_enumeration_order() {
    let reports = [
        platform("OpenCL 1.2 Acme", vec![]),
        platform(
            "OpenCL 3.0 Acme",
            vec![gpu("alpha", "OpenCL 3.0 Acme", 16), gpu("beta", "OpenCL 3.0 Acme", 64)],
        ),
        platform("OpenCL 2.0 Other", vec![gpu("gamma", "OpenCL 2.0 Other", 128)]),
    ];
    let chosen = pick(&reports, SelectionPolicy::FirstFound).unwrap();
    assert_eq!(chosen.name, "alpha");
}

#[test]
fn most_compute_units_ranks_across_platforms() {
    let reports = [
        platform("OpenCL 3.0 Acme", vec![gpu("small", "OpenCL 3.0 Acme", 16)]),
        platform("OpenCL 2.0 Other", vec![gpu("big", "OpenCL 2.0 Other", 128)]),
    ];
    let chosen = pick(&reports, SelectionPolicy::MostComputeUnits).unwrap();
    assert_eq!(chosen.name, "big");
}

#[test]
fn most_compute_units_keeps_earlier_device_on_ties() {
    let reports = [platform(
        "OpenCL 3.0 Acme",
        vec![gpu("first", "OpenCL 3.0 Acme", 64), gpu("second", "OpenCL 3.0 Acme", 64)],
    )];
    let chosen = pick(&reports, SelectionPolicy::MostComputeUnits).unwrap();
    assert_eq!(chosen.name, "first");
}

#[test]
fn picked_device_always_comes_from_the_snapshot() {
    let reports = [
        platform("OpenCL 1.2 Acme", vec![gpu("a", "OpenCL 1.2 Acme", 4)]),
        platform("OpenCL 1.2 Acme", vec![gpu("b", "OpenCL 1.2 Acme", 8)]),
    ];
    for policy in [SelectionPolicy::FirstFound, SelectionPolicy::MostComputeUnits] {
        let chosen = pick(&reports, policy).unwrap();
        assert!(
            reports
                .iter()
                .flat_map(|p| p.devices.iter())
                .any(|d| std::ptr::eq(d, chosen))
        );
        assert_eq!(chosen.class, DeviceClass::Gpu);
    }
}

#[test]
fn prober_rejects_devices_below_threshold() {
    let reports = [platform(
        "OpenCL 1.1 Acme",
        vec![gpu("old", "OpenCL 1.1 Acme-Build", 8)],
    )];
    assert!(!min_version_available(&reports, ClVersion::V1_2));
}

#[test]
fn prober_accepts_devices_at_threshold() {
    let reports = [platform(
        "OpenCL 1.2 Acme",
        vec![gpu("ok", "OpenCL 1.2 Acme-Build", 8)],
    )];
    assert!(min_version_available(&reports, ClVersion::V1_2));
}

#[test]
fn prober_is_monotonic_in_the_threshold() {
    let reports = [platform(
        "OpenCL 1.2 Acme",
        vec![gpu("ok", "OpenCL 1.2 Acme-Build", 8)],
    )];
    assert!(min_version_available(&reports, ClVersion::new(1, 2)));
    // Every threshold below one that passes must also pass.
    for (major, minor) in [(1, 1), (1, 0), (0, 5), (0, 0)] {
        assert!(min_version_available(&reports, ClVersion::new(major, minor)));
    }
    assert!(!min_version_available(&reports, ClVersion::new(2, 0)));
}

#[test]
fn prober_returns_false_for_empty_snapshots() {
    assert!(!min_version_available(&[], ClVersion::V1_2));
}

#[test]
fn garbled_version_strings_never_qualify() {
    let reports = [platform(
        "OpenCL 1.2 Acme",
        vec![gpu("odd", "FooCL one.two", 8), gpu("blank", "", 8)],
    )];
    assert!(!min_version_available(&reports, ClVersion::new(0, 1)));
}

#[test]
fn probing_twice_gives_the_same_answer() {
    let reports = [platform(
        "OpenCL 1.2 Acme",
        vec![gpu("ok", "OpenCL 1.2 Acme-Build", 8)],
    )];
    let first = min_version_available(&reports, ClVersion::V1_2);
    let second = min_version_available(&reports, ClVersion::V1_2);
    assert_eq!(first, second);
}
