//! Members example: a user entity composed with a validated email value

use this_guard::prelude::*;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    println!("🛡️  This-Guard Members Example\n");

    let create_user = define_entity_factory(validator_map! {
        id: [min_length(3)],
        name: [min_length(3)],
    });

    let mut user = create_user.create(record! {
        "id" => "123",
        "created" => Utc::now(),
        "name" => "jonathan",
    })?;

    user.set("name", "daniel");
    println!("✅ name after valid write:   {:?}", user["name"]);

    user.set("name", "");
    println!("🚫 name after invalid write: {:?}", user["name"]);

    let email = wrap(
        record! { "value" => "my@email.com" },
        validator_map! { value: [changed, format(FieldFormat::Email)] },
    )?;

    let mut member = wrap(
        record! {
            "id" => "123",
            "created" => Utc::now(),
            "name" => "daniel",
            "email" => email,
        },
        ValidatorMap::new().with("email", |candidate, _| is_object(candidate)),
    )?;

    if let Some(email) = member.object_mut("email") {
        for candidate in ["my@email.com", "not-an-email", "address@domain.com"] {
            let outcome = email.try_set("value", candidate);
            println!("📧 write {:<20} -> {:?}", candidate, outcome);
        }
    }

    member.set("email", "address@domain.com");
    println!("\n📋 Member: {}", serde_json::to_string_pretty(&member.to_json())?);

    Ok(())
}
