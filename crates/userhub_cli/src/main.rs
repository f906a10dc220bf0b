//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `userhub_core` linkage, configuration and logging wiring.
//! - Drive one full CRUD cycle through the service with deterministic output.

use log::error;
use std::process::ExitCode;
use userhub_core::{
    init_logging, CreateUserRequest, InMemoryUserRepository, ServiceConfig, SystemClock,
    UpdateUserRequest, UserService,
};

fn main() -> ExitCode {
    println!("userhub_core ping={}", userhub_core::ping());
    println!("userhub_core version={}", userhub_core::core_version());

    let config = match ServiceConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config error: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = init_logging(&config.log_level, &config.log_target) {
        eprintln!("logging error: {err}");
        return ExitCode::FAILURE;
    }
    println!(
        "config service={} env={} grpc_port={} http_port={}",
        config.service_name, config.environment, config.grpc_port, config.http_port
    );

    match run_smoke_cycle() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=smoke_cycle module=cli status=error error={err}");
            eprintln!("smoke cycle failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_smoke_cycle() -> Result<(), Box<dyn std::error::Error>> {
    let service = UserService::new(InMemoryUserRepository::new(), SystemClock);

    let created = service.create_user(&CreateUserRequest {
        email: "dev@example.com".to_string(),
        name: "Dev User".to_string(),
        role: "Engineer".to_string(),
    })?;
    println!("created email={} role={}", created.email, created.role);

    let fetched = service.get_user(&created.id)?;
    println!("fetched name={}", fetched.name);

    let updated = service.update_user(&UpdateUserRequest {
        id: created.id.clone(),
        role: Some("Manager".to_string()),
        ..UpdateUserRequest::default()
    })?;
    println!("updated role={} deactivated={}", updated.role, updated.deactivated);

    println!("listed count={}", service.list_users()?.len());

    service.delete_user(&created.id)?;
    println!("deleted remaining={}", service.list_users()?.len());
    Ok(())
}
