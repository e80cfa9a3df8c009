use elective_recommender::{FactorModel, RatingScale, RatingStore, RecErr, Trainer};

fn trained() -> (FactorModel, RatingStore) {
    let store = RatingStore::from_ratings(
        RatingScale::new(1., 5.).unwrap(),
        [
            ("s1", "c1", 5.),
            ("s1", "c2", 1.),
            ("s2", "c1", 1.),
            ("s2", "c2", 5.),
            ("s3", "c3", 3.5),
        ],
    )
    .unwrap();

    let trainer = Trainer::builder()
        .latent_dim(4)
        .epochs(50)
        .seed(9)
        .build()
        .unwrap();
    let (model, _) = trainer.train(&store).unwrap();
    (model, store)
}

#[test]
fn round_trip_keeps_every_prediction() {
    let (model, _) = trained();
    let restored = FactorModel::from_bytes(&model.to_bytes().unwrap()).unwrap();

    assert_eq!(restored, model);
    for s in model.student_ids() {
        for c in model.course_ids() {
            assert_eq!(restored.predict(s, c).unwrap(), model.predict(s, c).unwrap());
        }
    }
}

#[test]
fn save_and_load() {
    let (model, _) = trained();
    let path = std::env::temp_dir().join(format!("elective-model-{}.json", std::process::id()));

    model.save(&path).unwrap();
    let loaded = FactorModel::load(&path);
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded.unwrap(), model);
}

#[test]
fn restored_model_keeps_training() {
    let (model, store) = trained();
    let mut restored = FactorModel::from_bytes(&model.to_bytes().unwrap()).unwrap();

    let trainer = Trainer::builder().latent_dim(4).epochs(5).seed(1).build().unwrap();
    trainer.fit(&mut restored, &store).unwrap();

    assert_eq!(restored.epochs_trained(), model.epochs_trained() + 5);
}

#[test]
fn corrupt_input_is_rejected() {
    assert!(matches!(FactorModel::from_bytes(b"{}"), Err(RecErr::Json(_))));
    assert!(matches!(FactorModel::from_bytes(b"not json"), Err(RecErr::Json(_))));
}
