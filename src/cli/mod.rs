//! TL-040: CLI subcommands (path, new, generate).

use crate::core::error::Result;
use crate::core::parser;
use crate::core::resolver::PathResolver;
use crate::core::tree::ConfigTree;
use crate::core::types::{ApplyResult, EntityKind, EntryRef, PlanAction, ScaffoldPlan};
use crate::core::planner;
use crate::generator::{GeneratorOptions, ResourceGenerator};
use crate::scaffold::{
    DbOptions, InstanceMaker, InstanceOptions, PackageMaker, PackageOptions, ProjectMaker,
    ResourceMaker, Scaffold, SiteMaker, SiteOptions, SqlPrefix, WsgiOptions,
};
use crate::schema::SchemaModel;
use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment file read when `--config` is not given.
pub const DEFAULT_CONFIG: &str = ".trellis/environment.yaml";

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the directory of a named entity
    Path {
        /// Entity kind (instance, site, resource, package, project)
        kind: String,

        /// Entity name
        name: String,
    },

    /// Create an entity skeleton
    New {
        #[command(subcommand)]
        entity: NewCommand,
    },

    /// Generate admin resource files from a schema description
    Generate {
        /// Package whose tables are generated
        package: String,

        /// Schema description (YAML)
        #[arg(long)]
        schema: PathBuf,

        /// Package folder (default: resolved from the environment)
        #[arg(long)]
        package_dir: Option<PathBuf>,

        /// Restrict to these tables (repeatable)
        #[arg(long = "table")]
        tables: Vec<String>,

        /// Replace existing files
        #[arg(short, long)]
        force: bool,

        /// Also (re)write the package menu
        #[arg(long)]
        menu: bool,

        /// Form columns
        #[arg(long, default_value_t = 2)]
        columns: usize,

        /// Write cell widths in views
        #[arg(long)]
        guess_size: bool,

        /// Spaces per indent level
        #[arg(long, default_value_t = 4)]
        indent: usize,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Options shared by every `new` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct NewArgs {
    /// Folder the entity is created in (default: current)
    #[arg(long, conflicts_with = "project")]
    pub base: Option<PathBuf>,

    /// Create inside this project's folder for the entity kind
    #[arg(long)]
    pub project: Option<String>,

    /// Show the plan without creating anything
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Subcommand, Debug)]
pub enum NewCommand {
    /// Project with packages/sites/instances/resources folders
    Project {
        name: String,

        /// Folder the project is created in (default: current)
        #[arg(long)]
        base: Option<PathBuf>,

        #[arg(long)]
        dry_run: bool,
    },

    /// Site with WSGI bootstrap and siteconfig.xml
    Site {
        name: String,

        #[command(flatten)]
        common: NewArgs,

        /// Resource to load, `name` or `name=path` (repeatable)
        #[arg(long = "resource")]
        resources: Vec<EntryRef>,

        /// Instance served by the site
        #[arg(long)]
        instance: Option<String>,

        #[arg(long, default_value = crate::scaffold::site::DEFAULT_DOJO_VERSION)]
        dojo_version: String,

        #[arg(long)]
        wsgi_port: Option<u16>,

        #[arg(long)]
        wsgi_reload: bool,

        #[arg(long)]
        wsgi_debug: bool,

        #[arg(long)]
        wsgi_mainpackage: Option<String>,
    },

    /// Instance with custom/data folders and instanceconfig.xml
    Instance {
        name: String,

        #[command(flatten)]
        common: NewArgs,

        /// Package to enable, `name` or `name=path` (repeatable)
        #[arg(long = "package")]
        packages: Vec<EntryRef>,

        /// Leave out the authentication section
        #[arg(long)]
        no_authentication: bool,

        /// Package handling authentication
        #[arg(long)]
        auth_package: Option<String>,

        #[arg(long)]
        db_name: Option<String>,

        #[arg(long)]
        db_implementation: Option<String>,

        #[arg(long)]
        db_host: Option<String>,

        #[arg(long)]
        db_port: Option<u16>,

        #[arg(long)]
        db_user: Option<String>,

        #[arg(long)]
        db_password: Option<String>,

        /// Also create the dbstores folder
        #[arg(long)]
        dbstores: bool,
    },

    /// Package with model/lib/webpages/resources and main.py
    Package {
        name: String,

        #[command(flatten)]
        common: NewArgs,

        #[arg(long)]
        sqlschema: Option<String>,

        /// Custom sql table prefix
        #[arg(long, conflicts_with_all = ["no_sqlprefix", "omit_sqlprefix"])]
        sqlprefix: Option<String>,

        /// Declare `sqlprefix=False`
        #[arg(long, conflicts_with = "omit_sqlprefix")]
        no_sqlprefix: bool,

        /// Leave `sqlprefix` out of main.py
        #[arg(long)]
        omit_sqlprefix: bool,

        #[arg(long)]
        name_short: Option<String>,

        #[arg(long)]
        name_long: Option<String>,

        #[arg(long)]
        name_full: Option<String>,

        #[arg(long)]
        login_url: Option<String>,

        #[arg(long)]
        comment: Option<String>,

        /// Add a hello-world page
        #[arg(long)]
        hello_world: bool,
    },

    /// Resource folder
    Resource {
        name: String,

        #[command(flatten)]
        common: NewArgs,
    },
}

/// Dispatch a CLI command.
pub fn dispatch(cmd: Commands, config: Option<&Path>) -> Result<()> {
    let resolver = PathResolver::new(load_environment(config)?);
    match cmd {
        Commands::Path { kind, name } => cmd_path(&resolver, &kind, &name),
        Commands::New { entity } => cmd_new(&resolver, entity),
        Commands::Generate {
            package,
            schema,
            package_dir,
            tables,
            force,
            menu,
            columns,
            guess_size,
            indent,
            json,
        } => {
            let options = GeneratorOptions {
                force,
                menu,
                columns,
                guess_size,
                indent,
                tables,
            };
            cmd_generate(&resolver, &package, &schema, package_dir.as_deref(), options, json)
        }
    }
}

/// Load the environment. An explicit file must exist; a missing default
/// file gives an empty environment.
pub fn load_environment(explicit: Option<&Path>) -> Result<ConfigTree> {
    if let Some(path) = explicit {
        return parser::parse_environment_file(path);
    }
    let Some(path) = dirs::home_dir().map(|home| home.join(DEFAULT_CONFIG)) else {
        warn!("no home directory, using an empty environment");
        return Ok(ConfigTree::new());
    };
    if !path.is_file() {
        warn!(path = %path.display(), "environment file not found, using an empty environment");
        return Ok(ConfigTree::new());
    }
    debug!(path = %path.display(), "loading environment");
    parser::parse_environment_file(&path)
}

fn cmd_path(resolver: &PathResolver, kind: &str, name: &str) -> Result<()> {
    let kind: EntityKind = kind.parse()?;
    let path = resolver.resolve(name, kind, kind != EntityKind::Project)?;
    println!("{}", path.display());
    Ok(())
}

/// Base folder for a new entity: explicit, else inside a resolved project,
/// else the current folder.
fn new_base(resolver: &PathResolver, common: &NewArgs, kind: EntityKind) -> Result<Option<PathBuf>> {
    match (&common.base, &common.project) {
        (Some(base), _) => Ok(Some(base.clone())),
        (None, Some(project)) => Ok(Some(resolver.project_path(project)?.join(kind.plural()))),
        (None, None) => Ok(None),
    }
}

fn cmd_new(resolver: &PathResolver, entity: NewCommand) -> Result<()> {
    match entity {
        NewCommand::Project {
            name,
            base,
            dry_run,
        } => run_scaffold(&ProjectMaker::new(name, base), dry_run),
        NewCommand::Site {
            name,
            common,
            resources,
            instance,
            dojo_version,
            wsgi_port,
            wsgi_reload,
            wsgi_debug,
            wsgi_mainpackage,
        } => {
            let options = SiteOptions {
                resources,
                instance,
                dojo_version,
                wsgi: WsgiOptions {
                    reload: wsgi_reload,
                    debug: wsgi_debug,
                    port: wsgi_port,
                    mainpackage: wsgi_mainpackage,
                },
                config: None,
            };
            let base = new_base(resolver, &common, EntityKind::Site)?;
            run_scaffold(&SiteMaker::new(name, base, options), common.dry_run)
        }
        NewCommand::Instance {
            name,
            common,
            packages,
            no_authentication,
            auth_package,
            db_name,
            db_implementation,
            db_host,
            db_port,
            db_user,
            db_password,
            dbstores,
        } => {
            let options = InstanceOptions {
                packages,
                authentication: !no_authentication,
                authentication_pkg: auth_package,
                db: DbOptions {
                    dbname: db_name,
                    implementation: db_implementation,
                    host: db_host,
                    port: db_port,
                    user: db_user,
                    password: db_password,
                },
                use_dbstores: dbstores,
                config: None,
            };
            let base = new_base(resolver, &common, EntityKind::Instance)?;
            run_scaffold(&InstanceMaker::new(name, base, options), common.dry_run)
        }
        NewCommand::Package {
            name,
            common,
            sqlschema,
            sqlprefix,
            no_sqlprefix,
            omit_sqlprefix,
            name_short,
            name_long,
            name_full,
            login_url,
            comment,
            hello_world,
        } => {
            let sqlprefix = match (sqlprefix, no_sqlprefix, omit_sqlprefix) {
                (Some(prefix), _, _) => SqlPrefix::Custom(prefix),
                (None, true, _) => SqlPrefix::Disabled,
                (None, false, true) => SqlPrefix::Omit,
                (None, false, false) => SqlPrefix::Default,
            };
            let options = PackageOptions {
                sqlschema,
                sqlprefix,
                name_short,
                name_long,
                name_full,
                login_url,
                comment,
                hello_world,
            };
            let base = new_base(resolver, &common, EntityKind::Package)?;
            run_scaffold(&PackageMaker::new(name, base, options), common.dry_run)
        }
        NewCommand::Resource { name, common } => {
            let base = new_base(resolver, &common, EntityKind::Resource)?;
            run_scaffold(&ResourceMaker::new(name, base), common.dry_run)
        }
    }
}

fn run_scaffold(maker: &dyn Scaffold, dry_run: bool) -> Result<()> {
    let plan = maker.plan()?;
    print_plan(maker.name(), &plan);
    if dry_run {
        return Ok(());
    }
    let result = maker.apply()?;
    print_result(&result);
    Ok(())
}

/// Display a plan to stdout.
fn print_plan(name: &str, plan: &ScaffoldPlan) {
    println!("Planning: {} ({})", name, plan.root.display());
    println!();
    for change in &plan.changes {
        let symbol = match change.action {
            PlanAction::Create => "+",
            PlanAction::NoOp => " ",
        };
        println!("  {} {}", symbol, planner::describe(change));
    }
    println!();
    println!(
        "Plan: {} to create, {} unchanged.",
        plan.to_create, plan.unchanged
    );
}

fn print_result(result: &ApplyResult) {
    println!(
        "Apply: {} created, {} unchanged.",
        result.created.len(),
        result.unchanged.len()
    );
}

fn cmd_generate(
    resolver: &PathResolver,
    package: &str,
    schema: &Path,
    package_dir: Option<&Path>,
    options: GeneratorOptions,
    json: bool,
) -> Result<()> {
    let model = SchemaModel::from_file(schema)?;
    let package_dir = match package_dir {
        Some(dir) => dir.to_path_buf(),
        None => resolver.package_path(package)?,
    };
    let generator = ResourceGenerator::new(&model, package, package_dir, options);
    let reports = generator.make_resources()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            println!("{}: {}", report.file.display(), report.outcome);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Error;

    fn env_file(dir: &Path, yaml: &str) -> PathBuf {
        let path = dir.join("environment.yaml");
        std::fs::write(&path, yaml).unwrap();
        path
    }

    const SCHEMA: &str = r#"
packages:
  shop:
    tables:
      orders:
        columns:
          code: { dtype: A, size: 12 }
"#;

    #[test]
    fn test_tl040_path_resolves() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("pkgs/shop")).unwrap();
        let env = env_file(
            dir.path(),
            &format!("packages:\n  main: {{ path: {} }}\n", dir.path().join("pkgs").display()),
        );
        let cmd = Commands::Path {
            kind: "package".into(),
            name: "shop".into(),
        };
        dispatch(cmd, Some(&env)).unwrap();
    }

    #[test]
    fn test_tl040_path_unknown_kind() {
        let dir = tempfile::tempdir().unwrap();
        let env = env_file(dir.path(), "{}\n");
        let cmd = Commands::Path {
            kind: "widget".into(),
            name: "shop".into(),
        };
        let err = dispatch(cmd, Some(&env)).unwrap_err();
        assert!(matches!(err, Error::UnknownEntityType(_)));
    }

    #[test]
    fn test_tl040_explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_environment(Some(&dir.path().join("none.yaml"))).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_tl040_new_project_dry_run() {
        let dir = tempfile::tempdir().unwrap();
        let entity = NewCommand::Project {
            name: "demo".into(),
            base: Some(dir.path().to_path_buf()),
            dry_run: true,
        };
        cmd_new(&PathResolver::default(), entity).unwrap();
        assert!(!dir.path().join("demo").exists());
    }

    #[test]
    fn test_tl040_new_package_in_project() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("work/demo/packages")).unwrap();
        let env = env_file(
            dir.path(),
            &format!("projects:\n  work: {{ path: {} }}\n", dir.path().join("work").display()),
        );
        let entity = NewCommand::Package {
            name: "shop".into(),
            common: NewArgs {
                project: Some("demo".into()),
                ..NewArgs::default()
            },
            sqlschema: None,
            sqlprefix: None,
            no_sqlprefix: true,
            omit_sqlprefix: false,
            name_short: None,
            name_long: None,
            name_full: None,
            login_url: None,
            comment: None,
            hello_world: false,
        };
        dispatch(Commands::New { entity }, Some(&env)).unwrap();
        let main = std::fs::read_to_string(dir.path().join("work/demo/packages/shop/main.py"))
            .unwrap();
        assert!(main.contains("sqlprefix=False,"));
    }

    #[test]
    fn test_tl040_new_site_and_instance() {
        let dir = tempfile::tempdir().unwrap();
        let common = NewArgs {
            base: Some(dir.path().to_path_buf()),
            ..NewArgs::default()
        };
        let site = NewCommand::Site {
            name: "front".into(),
            common: common.clone(),
            resources: vec!["common".parse().unwrap()],
            instance: Some("prod".into()),
            dojo_version: "11".into(),
            wsgi_port: Some(8080),
            wsgi_reload: false,
            wsgi_debug: false,
            wsgi_mainpackage: None,
        };
        cmd_new(&PathResolver::default(), site).unwrap();
        let xml = std::fs::read_to_string(dir.path().join("front/siteconfig.xml")).unwrap();
        assert!(xml.contains("<wsgi port=\"8080\"/>"));

        let instance = NewCommand::Instance {
            name: "prod".into(),
            common,
            packages: vec!["shop=/srv/shop".parse().unwrap()],
            no_authentication: false,
            auth_package: None,
            db_name: None,
            db_implementation: Some("postgres".into()),
            db_host: None,
            db_port: None,
            db_user: None,
            db_password: None,
            dbstores: false,
        };
        cmd_new(&PathResolver::default(), instance).unwrap();
        let xml = std::fs::read_to_string(dir.path().join("prod/instanceconfig.xml")).unwrap();
        assert!(xml.contains("<db dbname=\"prod\" implementation=\"postgres\"/>"));
        assert!(xml.contains("<shop pkgcode=\"shop\" path=\"/srv/shop\"/>"));
    }

    #[test]
    fn test_tl040_new_in_unknown_project() {
        let entity = NewCommand::Resource {
            name: "common".into(),
            common: NewArgs {
                project: Some("ghost".into()),
                ..NewArgs::default()
            },
        };
        let err = cmd_new(&PathResolver::default(), entity).unwrap_err();
        assert!(matches!(err, Error::EntityNotFound { .. }));
    }

    #[test]
    fn test_tl040_generate_with_package_dir() {
        let dir = tempfile::tempdir().unwrap();
        let schema = dir.path().join("schema.yaml");
        std::fs::write(&schema, SCHEMA).unwrap();
        let pkg = dir.path().join("shop");
        cmd_generate(
            &PathResolver::default(),
            "shop",
            &schema,
            Some(&pkg),
            GeneratorOptions::default(),
            true,
        )
        .unwrap();
        assert!(pkg.join("resources/tables/orders/th_orders.py").is_file());
    }

    #[test]
    fn test_tl040_generate_resolves_package() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("pkgs/shop")).unwrap();
        let schema = dir.path().join("schema.yaml");
        std::fs::write(&schema, SCHEMA).unwrap();
        let env = env_file(
            dir.path(),
            &format!("packages:\n  main: {{ path: {} }}\n", dir.path().join("pkgs").display()),
        );
        let cmd = Commands::Generate {
            package: "shop".into(),
            schema,
            package_dir: None,
            tables: vec![],
            force: false,
            menu: true,
            columns: 2,
            guess_size: false,
            indent: 4,
            json: false,
        };
        dispatch(cmd, Some(&env)).unwrap();
        assert!(dir.path().join("pkgs/shop/menu.py").is_file());
    }

    #[test]
    fn test_tl040_generate_unresolvable_package() {
        let dir = tempfile::tempdir().unwrap();
        let schema = dir.path().join("schema.yaml");
        std::fs::write(&schema, SCHEMA).unwrap();
        let err = cmd_generate(
            &PathResolver::default(),
            "shop",
            &schema,
            None,
            GeneratorOptions::default(),
            false,
        )
        .unwrap_err();
        assert!(matches!(err, Error::EntityNotFound { .. }));
    }
}
