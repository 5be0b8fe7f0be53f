//! Basic Validation Example
//!
//! Validates a signup form, then shows custom rules, feedback handlers and
//! translation.
//!
//! Run with:
//! ```bash
//! cargo run -p ouroboros-validator --example basic_validation
//! ```

use ouroboros_validator::{
    Engine, Error, Feedback, Field, Introspect, Record, RuleResult, TranslationTable,
    ValidationContext, Value,
};

struct Signup {
    username: String,
    email: String,
    age: u32,
    password: String,
    password2: String,
    invite_code: Option<String>,
}

impl Introspect for Signup {
    fn introspect(&self) -> Value {
        Record::new("Signup")
            .field(Field::new("UserName", &self.username).validate("required,username,len:3-20"))
            .field(Field::new("Email", &self.email).validate("required,email"))
            .field(Field::new("Age", self.age).validate("gte:18"))
            .field(
                Field::new("Password", &self.password)
                    .validate("len:8-20,password:3")
                    .feedback("choose a stronger password"),
            )
            .field(Field::new("Password2", &self.password2).validate("eq_field:Password"))
            .field(Field::new("InviteCode", self.invite_code.clone()).validate("blank,invite"))
            .into()
    }
}

fn invite(ctx: &ValidationContext<'_>) -> RuleResult {
    match ctx.target().and_then(Value::as_str) {
        Some(code) if code.starts_with("OUR-") && code.len() == 10 => Ok(()),
        _ => Err(ctx.feedback("invalid invite code")),
    }
}

fn print_result(label: &str, result: &ouroboros_validator::Result<()>) {
    println!("{}", label);
    match result {
        Ok(()) => println!("  ✓ valid"),
        Err(Error::Validation(report)) => {
            for line in report.to_string().lines() {
                println!("  ✗ {}", line);
            }
        }
        Err(Error::Config(err)) => println!("  ! {}", err),
    }
    println!();
}

fn main() {
    println!("=== Ouroboros Validator: Basic Validation ===\n");

    let engine = Engine::new();
    engine.register_validator("invite", invite);

    let good = Signup {
        username: "jane.doe".to_string(),
        email: "jane@example.com".to_string(),
        age: 30,
        password: "Abc123!xyz".to_string(),
        password2: "Abc123!xyz".to_string(),
        invite_code: None,
    };
    print_result("1. Valid signup", &engine.validate(&good));

    let bad = Signup {
        username: "j".to_string(),
        email: "jane@".to_string(),
        age: 16,
        password: "abc".to_string(),
        password2: "abd".to_string(),
        invite_code: Some("XYZ".to_string()),
    };
    let result = engine.validate(&bad);
    print_result("2. Invalid signup", &result);

    engine.register_feedback_handler("gte", |f: &Feedback| {
        format!("{} must be at least {}", f.field, f.param)
    });
    print_result("3. With a custom 'gte' message", &engine.validate(&bad));

    if let Err(Error::Validation(mut report)) = result {
        let table = TranslationTable::new();
        table.register("required", |f: &Feedback| format!("{}不能为空", f.field));
        table.register("email", |_: &Feedback| "邮箱格式不正确".to_string());
        table.register("gte", |f: &Feedback| format!("必须大于等于{}", f.param));
        report.set_translator(table);
        print_result("4. Translated report", &Err(Error::Validation(report)));
    }

    let broken = Record::new("Broken").field(Field::new("Name", "x").validate("frobnicate"));
    print_result("5. Misconfigured record", &engine.validate(&broken));
}
