//! Database integration tests for the repositories
//!
//! These need a real PostgreSQL instance and are ignored by default.
//! Run with a disposable database:
//!
//!   DATABASE_URL=postgres://localhost/lostpaws_test \
//!       cargo test -p lostpaws-server -- --ignored
//!
//! Tests share one database, so every fixture uses a unique e-mail and
//! asserts only on rows it created itself.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::NaiveDate;
use sqlx::PgPool;

use lostpaws_server::db::{
    create_pool, ensure_schema, DbError, NewPet, NewReport, NewUser, PetRepo, ReportRepo, UserRepo,
};
use lostpaws_server::models::{PetStatus, Sex, Species};

async fn test_pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let pool = create_pool(&url).await.expect("pool creation failed");
    ensure_schema(&pool).await.expect("schema init failed");
    pool
}

fn unique_email(tag: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    format!("{}+{}@example.com", tag, nanos)
}

fn sample_user(tag: &str) -> NewUser {
    NewUser {
        nome: "Ana".into(),
        sobrenome: "Silva".into(),
        e_mail: unique_email(tag),
        telefone: "11 99999-0000".into(),
    }
}

fn sample_pet(id_usuario: i32, data: NaiveDate) -> NewPet {
    NewPet {
        nome: "Rex".into(),
        especie: Species::Dog,
        raca: Some("Vira-lata".into()),
        situacao: PetStatus::Lost,
        foto: Some("20240301_101500_rex.png".into()),
        data,
        sexo: Sex::Male,
        descricao: "Caramelo, coleira azul".into(),
        mensagem_dono: Some("Oferece recompensa".into()),
        nome_tutor: "Ana".into(),
        telefone_tutor: "11 99999-0000".into(),
        visto_em: "Praça da Sé".into(),
        id_usuario,
    }
}

async fn insert_user(pool: &PgPool, tag: &str) -> (i32, String) {
    let user = sample_user(tag);
    let id = UserRepo::new(pool)
        .create(&user)
        .await
        .expect("user insert failed");
    (id, user.e_mail)
}

#[tokio::test]
#[ignore = "requires database"]
async fn duplicate_email_is_rejected() {
    let pool = test_pool().await;
    let repo = UserRepo::new(&pool);

    let user = sample_user("dup");
    repo.create(&user).await.expect("first registration failed");

    let err = repo
        .create(&user)
        .await
        .expect_err("second registration with the same e-mail succeeded");
    assert!(matches!(err, DbError::UniqueViolation { .. }));
}

#[tokio::test]
#[ignore = "requires database"]
async fn find_by_email_missing_is_none() {
    let pool = test_pool().await;

    let found = UserRepo::new(&pool)
        .find_by_email(&unique_email("ghost"))
        .await
        .expect("lookup failed");
    assert!(found.is_none());
}

#[tokio::test]
#[ignore = "requires database"]
async fn find_by_email_returns_the_full_entity() {
    let pool = test_pool().await;
    let repo = UserRepo::new(&pool);

    let new_user = sample_user("full");
    let id = repo.create(&new_user).await.expect("insert failed");

    let user = repo
        .find_by_email(&new_user.e_mail)
        .await
        .expect("lookup failed")
        .expect("user not found");

    assert_eq!(user.id_usuario, id);
    assert_eq!(user.nome, new_user.nome);
    assert_eq!(user.sobrenome, new_user.sobrenome);
    assert_eq!(user.e_mail, new_user.e_mail);
    assert_eq!(user.telefone, new_user.telefone);
    assert!(!user.is_admin);
}

#[tokio::test]
#[ignore = "requires database"]
async fn pet_with_dangling_owner_is_rejected() {
    let pool = test_pool().await;

    let err = PetRepo::new(&pool)
        .create(&sample_pet(-1, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()))
        .await
        .expect_err("insert with a dangling owner succeeded");
    assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
}

/// The enum columns are typed on the Rust side, so an invalid label can
/// only reach the datastore through raw SQL; the CHECK constraints are
/// the last line of defense and must hold on their own.
async fn insert_raw_pet(
    pool: &PgPool,
    id_usuario: i32,
    especie: &str,
    situacao: &str,
    sexo: &str,
) -> Result<i32, DbError> {
    let (id,): (i32,) = sqlx::query_as(
        r#"
        INSERT INTO pet (nome, especie, raca, situacao, foto, data, sexo,
                         descricao, mensagem_dono, nome_tutor, telefone_tutor,
                         visto_em, id_usuario)
        VALUES ($1, $2, NULL, $3, NULL, $4, $5, $6, NULL, $7, $8, $9, $10)
        RETURNING id_pet
        "#,
    )
    .bind("Rex")
    .bind(especie)
    .bind(situacao)
    .bind(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
    .bind(sexo)
    .bind("descricao")
    .bind("Ana")
    .bind("11 99999-0000")
    .bind("Praça da Sé")
    .bind(id_usuario)
    .fetch_one(pool)
    .await
    .map_err(DbError::from)?;

    Ok(id)
}

#[tokio::test]
#[ignore = "requires database"]
async fn enum_check_constraints_are_enforced() {
    let pool = test_pool().await;
    let (owner, _) = insert_user(&pool, "checks").await;

    let err = insert_raw_pet(&pool, owner, "Dinossauro", "Perdido", "Macho")
        .await
        .expect_err("invalid especie accepted");
    assert!(matches!(err, DbError::CheckViolation { .. }));

    let err = insert_raw_pet(&pool, owner, "Gato", "Sumido", "Macho")
        .await
        .expect_err("invalid situacao accepted");
    assert!(matches!(err, DbError::CheckViolation { .. }));

    let err = insert_raw_pet(&pool, owner, "Gato", "Perdido", "Indefinido")
        .await
        .expect_err("invalid sexo accepted");
    assert!(matches!(err, DbError::CheckViolation { .. }));

    // sanity: valid labels still pass
    insert_raw_pet(&pool, owner, "Gato", "Achado", "Fêmea")
        .await
        .expect("valid labels rejected");
}

#[tokio::test]
#[ignore = "requires database"]
async fn deleting_a_pet_cascades_its_reports() {
    let pool = test_pool().await;
    let (owner, _) = insert_user(&pool, "cascade-owner").await;
    let (reporter, _) = insert_user(&pool, "cascade-reporter").await;

    let pet_repo = PetRepo::new(&pool);
    let report_repo = ReportRepo::new(&pool);

    let id_pet = pet_repo
        .create(&sample_pet(owner, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()))
        .await
        .expect("pet insert failed");

    for motivo in ["Anúncio falso", "Conteúdo impróprio", "Duplicado"] {
        report_repo
            .create(&NewReport {
                id_pet,
                id_usuario: reporter,
                motivo: motivo.into(),
            })
            .await
            .expect("report insert failed");
    }

    let deleted = pet_repo.delete_by_id(id_pet).await.expect("delete failed");
    assert!(deleted);

    let (remaining,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM denuncia WHERE id_pet = $1")
            .bind(id_pet)
            .fetch_one(&pool)
            .await
            .expect("count failed");
    assert_eq!(remaining, 0);

    let gone = pet_repo.find_by_id(id_pet).await.expect("lookup failed");
    assert!(gone.is_none());
}

#[tokio::test]
#[ignore = "requires database"]
async fn pets_are_listed_most_recent_first() {
    let pool = test_pool().await;
    let (owner, _) = insert_user(&pool, "ordering").await;
    let repo = PetRepo::new(&pool);

    let mut ids = Vec::new();
    for (y, m, d) in [(2024, 1, 1), (2024, 3, 1), (2024, 2, 1)] {
        let id = repo
            .create(&sample_pet(owner, NaiveDate::from_ymd_opt(y, m, d).unwrap()))
            .await
            .expect("pet insert failed");
        ids.push(id);
    }
    let (january, march, february) = (ids[0], ids[1], ids[2]);

    let listed: Vec<i32> = repo
        .list_all()
        .await
        .expect("list failed")
        .into_iter()
        .map(|p| p.id_pet)
        .filter(|id| ids.contains(id))
        .collect();

    assert_eq!(listed, vec![march, february, january]);
}

#[tokio::test]
#[ignore = "requires database"]
async fn reports_are_listed_newest_first() {
    let pool = test_pool().await;
    let (owner, _) = insert_user(&pool, "report-order").await;

    let id_pet = PetRepo::new(&pool)
        .create(&sample_pet(owner, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()))
        .await
        .expect("pet insert failed");

    let repo = ReportRepo::new(&pool);
    let mut ids = Vec::new();
    for motivo in ["primeira", "segunda"] {
        let id = repo
            .create(&NewReport {
                id_pet,
                id_usuario: owner,
                motivo: motivo.into(),
            })
            .await
            .expect("report insert failed");
        ids.push(id);
        // distinct creation timestamps
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let listed: Vec<i32> = repo
        .list_all()
        .await
        .expect("list failed")
        .into_iter()
        .map(|r| r.id_denuncia)
        .filter(|id| ids.contains(id))
        .collect();

    assert_eq!(listed, vec![ids[1], ids[0]]);
}

#[tokio::test]
#[ignore = "requires database"]
async fn pet_round_trip_preserves_every_field() {
    let pool = test_pool().await;
    let (owner, _) = insert_user(&pool, "roundtrip").await;
    let repo = PetRepo::new(&pool);

    let new_pet = sample_pet(owner, NaiveDate::from_ymd_opt(2024, 2, 14).unwrap());
    let id_pet = repo.create(&new_pet).await.expect("pet insert failed");

    let pet = repo
        .find_by_id(id_pet)
        .await
        .expect("lookup failed")
        .expect("pet not found");

    assert_eq!(pet.id_pet, id_pet);
    assert_eq!(pet.nome, new_pet.nome);
    assert_eq!(pet.especie, new_pet.especie);
    assert_eq!(pet.raca, new_pet.raca);
    assert_eq!(pet.situacao, new_pet.situacao);
    assert_eq!(pet.foto, new_pet.foto);
    assert_eq!(pet.data, new_pet.data);
    assert_eq!(pet.sexo, new_pet.sexo);
    assert_eq!(pet.descricao, new_pet.descricao);
    assert_eq!(pet.mensagem_dono, new_pet.mensagem_dono);
    assert_eq!(pet.nome_tutor, new_pet.nome_tutor);
    assert_eq!(pet.telefone_tutor, new_pet.telefone_tutor);
    assert_eq!(pet.visto_em, new_pet.visto_em);
    assert_eq!(pet.id_usuario, owner);
    assert_eq!(pet.nome_usuario, "Ana");
}

#[tokio::test]
#[ignore = "requires database"]
async fn report_timestamp_is_assigned_by_the_datastore() {
    let pool = test_pool().await;
    let (owner, _) = insert_user(&pool, "stamp").await;

    let id_pet = PetRepo::new(&pool)
        .create(&sample_pet(owner, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()))
        .await
        .expect("pet insert failed");

    let repo = ReportRepo::new(&pool);
    let id = repo
        .create(&NewReport {
            id_pet,
            id_usuario: owner,
            motivo: "carimbado".into(),
        })
        .await
        .expect("report insert failed");

    let report = repo
        .list_all()
        .await
        .expect("list failed")
        .into_iter()
        .find(|r| r.id_denuncia == id)
        .expect("report not listed");

    let age = chrono::Utc::now() - report.data_denuncia;
    assert!(age.num_seconds() < 60, "timestamp not recent: {}", report.data_denuncia);
}
