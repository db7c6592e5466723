use shapekey_transfer_core::{
    mirror::{drivers_for, matching_channels},
    transfer_drivers, ChannelPath, DriverDefinition, DriverKind, DriverStore, DriverVariable,
    MemoryMesh, TargetField, TransferError, TransformSpace, TransformType, Vec3, VariableKind,
    VariableTarget, BASIS,
};

fn mesh_with(names: &[&str]) -> MemoryMesh {
    let verts = vec![Vec3::ZERO; 3];
    let mut mesh = MemoryMesh::new(verts.clone()).with_channel(BASIS, verts.clone(), 0.0);
    for name in names {
        mesh = mesh.with_channel(name, verts.clone(), 0.0);
    }
    mesh
}

fn blink_driver() -> DriverDefinition {
    let mut frame = DriverVariable::new("frame", VariableKind::SingleProp);
    frame.targets[0].referenced_object = Some("Scene".into());
    frame.targets[0].data_path = "frame_current".into();
    DriverDefinition {
        target_path: ChannelPath::weight("Blink").to_string(),
        kind: DriverKind::Scripted,
        expression: "frame/24".into(),
        variables: vec![frame],
    }
}

fn definitions(mesh: &MemoryMesh, name: &str) -> Vec<DriverDefinition> {
    drivers_for(mesh, name).into_iter().map(|(_, d)| d).collect()
}

/// it should copy one scripted driver with its variable onto the matching channel
#[test]
fn scenario_d_copies_expression_driver() {
    let source = mesh_with(&["Blink"]).with_driver(blink_driver());
    let mut target = mesh_with(&["Blink"]);

    let summary = transfer_drivers(Some(&mut target), Some(&source)).unwrap();
    assert_eq!(summary.drivers_transferred, 1);
    assert_eq!(summary.matching_channels, 1);

    let copied = definitions(&target, "Blink");
    assert_eq!(copied.len(), 1);
    let driver = &copied[0];
    assert_eq!(driver.expression, "frame/24");
    assert_eq!(driver.kind, DriverKind::Scripted);
    assert_eq!(driver.variables.len(), 1);
    assert_eq!(driver.variables[0].name, "frame");
    assert_eq!(driver.variables[0].kind, VariableKind::SingleProp);
    assert_eq!(
        driver.variables[0].targets[0].referenced_object.as_deref(),
        Some("Scene")
    );
    assert_eq!(driver.variables[0].targets[0].data_path, "frame_current");
    assert_eq!(
        summary.message(),
        "Transferred 1 drivers for 1 matching shape keys"
    );
}

/// it should replace old drivers on the channel and leave other channels alone
#[test]
fn replaces_existing_drivers_only_on_matching_weight() {
    let source = mesh_with(&["Blink"]).with_driver(blink_driver());
    let mut target = mesh_with(&["Blink", "Frown"])
        .with_driver(DriverDefinition {
            target_path: ChannelPath::weight("Blink").to_string(),
            kind: DriverKind::Sum,
            expression: "old".into(),
            variables: Vec::new(),
        })
        .with_driver(DriverDefinition {
            target_path: ChannelPath::weight("Blink").to_string(),
            kind: DriverKind::Max,
            ..Default::default()
        })
        .with_driver(DriverDefinition {
            target_path: ChannelPath::weight("Frown").to_string(),
            expression: "sad".into(),
            ..Default::default()
        })
        .with_driver(DriverDefinition {
            target_path: "key_blocks[\"Blink\"].slider_max".into(),
            expression: "1".into(),
            ..Default::default()
        });

    transfer_drivers(Some(&mut target), Some(&source)).unwrap();

    let blink = definitions(&target, "Blink");
    assert_eq!(blink, vec![blink_driver()]);
    let frown = definitions(&target, "Frown");
    assert_eq!(frown.len(), 1);
    assert_eq!(frown[0].expression, "sad");
    assert!(target
        .drivers()
        .any(|d| d.target_path == "key_blocks[\"Blink\"].slider_max"));
    assert_eq!(target.list_drivers().len(), 3);
}

/// it should keep target drivers when the source channel has none
#[test]
fn channel_without_source_drivers_is_skipped() {
    let source = mesh_with(&["Blink", "Smile"]).with_driver(blink_driver());
    let keep = DriverDefinition {
        target_path: ChannelPath::weight("Smile").to_string(),
        expression: "keep_me".into(),
        ..Default::default()
    };
    let mut target = mesh_with(&["Smile"]).with_driver(keep.clone());

    let summary = transfer_drivers(Some(&mut target), Some(&source)).unwrap();
    assert_eq!(summary.drivers_transferred, 0);
    assert_eq!(summary.matching_channels, 1);
    assert_eq!(summary.channels_without_drivers, 1);
    assert_eq!(summary.message(), "No drivers found to transfer");
    assert_eq!(definitions(&target, "Smile"), vec![keep]);
}

/// it should copy supported fields per slot and skip the rest
#[test]
fn unsupported_fields_are_skipped_not_fatal() {
    let mut dist = DriverVariable::new("dist", VariableKind::LocDiff);
    for (slot, bone) in ["lip.upper", "lip.lower"].iter().enumerate() {
        dist.targets[slot] = VariableTarget {
            referenced_object: Some("Armature".into()),
            bone_path: bone.to_string(),
            data_path: "ignored".into(),
            transform_type: TransformType::RotZ,
            transform_space: TransformSpace::LocalSpace,
        };
    }
    let source = mesh_with(&["Jaw"]).with_driver(DriverDefinition {
        target_path: ChannelPath::weight("Jaw").to_string(),
        kind: DriverKind::Average,
        expression: String::new(),
        variables: vec![dist],
    });
    let mut target = mesh_with(&["Jaw"]);
    target.restrict_field(TargetField::TransformSpace);

    let summary = transfer_drivers(Some(&mut target), Some(&source)).unwrap();
    assert_eq!(summary.drivers_transferred, 1);
    // LocDiff rejects DataPath and TransformType; the host also rejects
    // TransformSpace. Three fields on each of two slots.
    assert_eq!(summary.fields_skipped, 6);

    let copied = definitions(&target, "Jaw");
    let var = &copied[0].variables[0];
    assert_eq!(var.targets.len(), 2);
    assert_eq!(var.targets[1].bone_path, "lip.lower");
    assert_eq!(var.targets[0].referenced_object.as_deref(), Some("Armature"));
    assert_eq!(var.targets[0].data_path, "");
    assert_eq!(var.targets[0].transform_type, TransformType::LocX);
    assert_eq!(var.targets[0].transform_space, TransformSpace::WorldSpace);
}

/// it should match names in source order and ignore Basis
#[test]
fn matching_excludes_basis() {
    let source = mesh_with(&["C", "A", "B"]);
    let target = mesh_with(&["B", "C"]);
    assert_eq!(matching_channels(&target, &source), vec!["C", "B"]);
}

/// it should report the precondition that failed
#[test]
fn precondition_errors() {
    let source = mesh_with(&["Blink"]).with_driver(blink_driver());

    let mut only_basis = mesh_with(&[]);
    assert_eq!(
        transfer_drivers(Some(&mut only_basis), Some(&source)).unwrap_err(),
        TransferError::TargetHasNoChannels
    );

    let mut target = mesh_with(&["Blink"]);
    assert_eq!(
        transfer_drivers(Some(&mut target), Some(&mesh_with(&[]))).unwrap_err(),
        TransferError::SourceHasNoChannels
    );

    let mut other = mesh_with(&["Smile"]);
    assert_eq!(
        transfer_drivers(Some(&mut other), Some(&source)).unwrap_err(),
        TransferError::NoMatchingChannels
    );
    assert!(other.list_drivers().is_empty());

    assert_eq!(
        transfer_drivers::<MemoryMesh, MemoryMesh>(None, Some(&source)).unwrap_err(),
        TransferError::MissingEndpoint
    );
}

/// it should produce the same target drivers when run twice
#[test]
fn repeated_transfer_does_not_duplicate() {
    let source = mesh_with(&["Blink"]).with_driver(blink_driver());
    let mut target = mesh_with(&["Blink"]);
    transfer_drivers(Some(&mut target), Some(&source)).unwrap();
    transfer_drivers(Some(&mut target), Some(&source)).unwrap();
    assert_eq!(definitions(&target, "Blink"), vec![blink_driver()]);
}
