use school_timetable::schedule::{
    all_slots, assign, generate_week, is_available, Day, GapReason, Rejection, SchoolClass, Slot,
    SlotSet, Subject, Teacher, TeacherId, Timetable,
};

fn slot(key: &str) -> Slot {
    key.parse().unwrap()
}

fn class(n: u8) -> SchoolClass {
    SchoolClass::new(n).unwrap()
}

fn teacher(id: u64, subject: Subject, classes: &[u8], slots: &[&str]) -> Teacher {
    Teacher {
        id: TeacherId(id),
        name: format!("Учитель {}", id),
        subject,
        classes: classes.iter().map(|&c| class(c)).collect(),
        available_slots: slots.iter().map(|s| slot(s)).collect::<SlotSet>(),
    }
}

fn sample_registry() -> Vec<Teacher> {
    vec![
        teacher(3, Subject::Mathematics, &[1, 2], &["Понедельник-1", "Понедельник-2", "Вторник-1"]),
        teacher(1, Subject::Russian, &[1], &["Понедельник-1", "Среда-4"]),
        teacher(2, Subject::Mathematics, &[1], &["Понедельник-2", "Четверг-8"]),
        teacher(5, Subject::History, &[2, 3], &["Вторник-1", "Пятница-5", "Пятница-6"]),
        teacher(4, Subject::Music, &[11], &["Понедельник-1"]),
    ]
}

#[test]
fn test_scenario_a_earlier_teacher_overwrites_manual_placement() {
    let a = teacher(1, Subject::Mathematics, &[1], &["Понедельник-1"]);
    let b = teacher(2, Subject::Mathematics, &[1], &["Понедельник-1"]);
    let mon1 = slot("Понедельник-1");

    let with_b = assign(&Timetable::new(), mon1, &b, class(1)).unwrap();
    assert_eq!(with_b.get(mon1).unwrap().teacher_id, TeacherId(2));

    let with_a = assign(&with_b, mon1, &a, class(1)).unwrap();
    assert_eq!(with_a.get(mon1).unwrap().teacher_id, TeacherId(1));
    assert_eq!(with_a.len(), 1);

    let back_to_b = assign(&with_a, mon1, &b, class(1));
    assert!(matches!(back_to_b, Err(Rejection::LowerPriority { .. })));
}

#[test]
fn test_scenario_b_teacher_without_availability_is_always_unavailable() {
    let c = teacher(7, Subject::History, &[4], &[]);
    for s in all_slots() {
        assert_eq!(
            assign(&Timetable::new(), s, &c, class(4)),
            Err(Rejection::Unavailable {
                teacher: TeacherId(7),
                slot: s
            })
        );
    }
}

#[test]
fn test_scenario_c_missing_music_teacher_is_a_gap() {
    let generation = generate_week(&sample_registry());
    let fifth = class(5);

    assert!(generation.has_gap(fifth, Subject::Music));
    let gap = generation
        .gaps
        .iter()
        .find(|g| g.class_name == fifth && g.subject == Subject::Music)
        .unwrap();
    assert_eq!(gap.reason, GapReason::NoCandidates);
    assert!(generation
        .timetable
        .iter()
        .all(|(_, a)| !(a.class_name == fifth && a.subject == Subject::Music)));
}

#[test]
fn test_scenario_d_disjoint_availability_fills_union_preferring_lower_id() {
    let teachers = vec![
        teacher(2, Subject::Literature, &[3], &["Вторник-1", "Вторник-2", "Среда-1"]),
        teacher(1, Subject::Literature, &[3], &["Понедельник-5", "Вторник-2"]),
    ];
    let generation = generate_week(&teachers);
    let tt = &generation.timetable;

    assert_eq!(tt.len(), 4);
    assert_eq!(tt.get(slot("Понедельник-5")).unwrap().teacher_id, TeacherId(1));
    assert_eq!(tt.get(slot("Вторник-1")).unwrap().teacher_id, TeacherId(2));
    assert_eq!(tt.get(slot("Вторник-2")).unwrap().teacher_id, TeacherId(1));
    assert_eq!(tt.get(slot("Среда-1")).unwrap().teacher_id, TeacherId(2));
    assert!(!generation.has_gap(class(3), Subject::Literature));
}

#[test]
fn test_generation_is_deterministic_and_order_independent() {
    let registry = sample_registry();
    let first = generate_week(&registry);
    let second = generate_week(&registry);
    assert_eq!(first, second);

    let mut reversed = registry.clone();
    reversed.reverse();
    assert_eq!(generate_week(&reversed), first);
}

#[test]
fn test_every_generated_assignment_is_valid() {
    let registry = sample_registry();
    let generation = generate_week(&registry);

    for (s, a) in generation.timetable.iter() {
        let t = registry.iter().find(|t| t.id == a.teacher_id).unwrap();
        assert!(is_available(t, s));
        assert!(t.teaches(a.class_name, a.subject));
    }
}

#[test]
fn test_no_lower_id_teacher_was_passed_over_within_a_pair() {
    let registry = sample_registry();
    let generation = generate_week(&registry);

    for (s, a) in generation.timetable.iter() {
        let passed_over = registry.iter().any(|t| {
            t.id < a.teacher_id && t.teaches(a.class_name, a.subject) && is_available(t, s)
        });
        assert!(!passed_over, "slot {} went to {} over an earlier teacher", s, a.teacher_id);
    }
}

#[test]
fn test_manual_assign_never_overwrites_with_higher_or_equal_id() {
    let registry = sample_registry();
    let generation = generate_week(&registry);

    for (s, held) in generation.timetable.iter() {
        for t in &registry {
            let result = assign(&generation.timetable, s, t, class(1));
            if let Ok(updated) = result {
                assert!(t.id < held.teacher_id);
                assert_eq!(updated.get(s).unwrap().teacher_id, t.id);
            }
        }
    }
}

#[test]
fn test_shared_slot_goes_to_first_class_in_order() {
    let generation = generate_week(&sample_registry());
    let mon1 = Slot::new(Day::Monday, 1).unwrap();
    let a = generation.timetable.get(mon1).unwrap();

    // Russian for class 1 is walked before Mathematics and before class 11's music.
    assert_eq!(a.class_name, class(1));
    assert_eq!(a.subject, Subject::Russian);
    assert_eq!(a.teacher_id, TeacherId(1));
    assert!(generation
        .gaps
        .iter()
        .any(|g| g.class_name == class(11) && g.subject == Subject::Music && g.reason == GapReason::NoFreeSlots));
}
