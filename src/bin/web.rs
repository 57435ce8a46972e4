//! Single binary web server: JSON API for the squad manager frontend, static bundle from /static.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8000 by default.
//! Override with env: HOST, PORT, ROLES_PATH, FORMATIONS_PATH, PLAYERS_API_URL,
//! OWNER_WALLET, MARKETPLACE_API_URL, STATIC_DIR.

use actix_files::Files;
use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use mfl_squad_fit::logic::rank_listings;
use mfl_squad_fit::models::SquadSummary;
use mfl_squad_fit::remote::{http_client, select_by_ids, MarketplaceClient, PlayerApiClient, RemoteError};
use mfl_squad_fit::{
    analyze_player, assign_squad_with, AssignmentPolicy, Attribute, ClubRegistry, FitError,
    Formation, FormationCatalog, FormationSlot, MarketQuery, Player, PlayerId, Role, RoleCatalog,
    RoleMap, SlotRole, TierTable, DEFAULT_TIER,
};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::RwLock;

/// Catalogs and clubs shared by all requests.
struct Catalogs {
    roles: RoleCatalog,
    formations: FormationCatalog,
    tiers: TierTable,
    clubs: ClubRegistry,
    /// Where role edits are written back, if roles were loaded from JSON.
    roles_path: Option<PathBuf>,
}

type AppState = Data<RwLock<Catalogs>>;

/// External collaborators.
struct Services {
    players: PlayerApiClient,
    market: MarketplaceClient,
}

type AppServices = Data<Services>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct AssignSquadBody {
    /// Formation to take slots and default roles from. Without it, `role_map` alone defines the slots.
    #[serde(default)]
    formation_name: Option<String>,
    #[serde(default)]
    role_map: RoleMap,
    #[serde(default = "default_tier")]
    tier: String,
    #[serde(default)]
    policy: AssignmentPolicy,
}

#[derive(Deserialize)]
struct SimulateBody {
    player_ids: Vec<PlayerId>,
    #[serde(flatten)]
    squad: AssignSquadBody,
}

#[derive(Deserialize)]
struct PlayerIdsBody {
    player_ids: Vec<PlayerId>,
}

#[derive(Deserialize)]
struct AnalysisQuery {
    #[serde(default)]
    tier: Option<String>,
}

#[derive(Deserialize)]
struct CreateClubBody {
    club_name: String,
    #[serde(default = "default_tier")]
    tier: String,
    #[serde(default)]
    roster: Vec<PlayerId>,
}

/// Roster update: either a bare id list or an object with roster and/or tier.
#[derive(Deserialize)]
#[serde(untagged)]
enum UpdateClubBody {
    Roster(Vec<PlayerId>),
    Fields {
        #[serde(default)]
        roster: Option<Vec<PlayerId>>,
        #[serde(default)]
        tier: Option<String>,
    },
}

#[derive(Deserialize)]
struct PlayerAssignmentBody {
    player_id: PlayerId,
    old_club_name: String,
    new_club_name: String,
}

#[derive(Deserialize)]
struct MarketSearchBody {
    role_name: String,
    #[serde(default = "default_tier")]
    tier: String,
    auth_token: String,
}

/// Canonical formation body, or the legacy `{ "<name>": { "<slot>": "<role>" } }` shape.
#[derive(Deserialize)]
#[serde(untagged)]
enum FormationBody {
    Canonical(Formation),
    Legacy(std::collections::BTreeMap<String, RoleMap>),
}

/// Slots for an update: canonical slot list or a slot -> role map.
#[derive(Deserialize)]
#[serde(untagged)]
enum FormationSlotsBody {
    Slots(Vec<FormationSlot>),
    RoleMap(RoleMap),
}

/// Path segment: catalog entry name (role, formation, or club)
#[derive(Deserialize)]
struct NamePath {
    name: String,
}

/// Path segment: player id
#[derive(Deserialize)]
struct PlayerPath {
    id: PlayerId,
}

fn default_tier() -> String {
    DEFAULT_TIER.to_string()
}

fn error_json(msg: impl std::fmt::Display) -> serde_json::Value {
    serde_json::json!({ "error": msg.to_string() })
}

/// 404 for references to missing entries, 400 for everything else.
fn fit_error_response(e: &FitError) -> HttpResponse {
    if e.is_not_found() {
        HttpResponse::NotFound().json(error_json(e))
    } else {
        HttpResponse::BadRequest().json(error_json(e))
    }
}

fn remote_error_response(e: &RemoteError) -> HttpResponse {
    log::warn!("upstream failure: {}", e);
    HttpResponse::BadGateway().json(error_json(e))
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "mfl-squad-fit",
    })
}

/// Browsers request this on every page load; answer without a body.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Attribute short codes, for the role editor.
#[get("/attributes")]
async fn api_attributes() -> HttpResponse {
    let codes: Vec<&str> = Attribute::ALL.iter().map(|a| a.code()).collect();
    HttpResponse::Ok().json(codes)
}

/// Tier names (entry tier first) and their thresholds.
#[get("/tiers")]
async fn api_tiers(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(serde_json::json!({
        "tiers": g.tiers.names(),
        "thresholds": g.tiers.tiers(),
    }))
}

#[get("/roles")]
async fn api_roles(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(&g.roles)
}

/// Snapshot of the role catalog to persist, if roles were loaded from a JSON file.
fn roles_snapshot(catalogs: &Catalogs) -> Option<(PathBuf, String)> {
    let path = catalogs.roles_path.clone()?;
    match catalogs.roles.to_json() {
        Ok(json) => Some((path, json)),
        Err(e) => {
            log::warn!("could not serialize roles: {}", e);
            None
        }
    }
}

/// Write a role snapshot taken under the lock. Failures are logged, not fatal.
async fn save_roles(snapshot: Option<(PathBuf, String)>) {
    if let Some((path, json)) = snapshot {
        if let Err(e) = tokio::fs::write(&path, json).await {
            log::warn!("could not save roles to {}: {}", path.display(), e);
        }
    }
}

#[post("/roles")]
async fn api_create_role(state: AppState, body: Json<Role>) -> HttpResponse {
    let role = body.into_inner();
    let snapshot = {
        let mut g = match state.write() {
            Ok(guard) => guard,
            Err(_) => return lock_error(),
        };
        if let Err(e) = g.roles.insert(role.clone()) {
            return fit_error_response(&e);
        }
        roles_snapshot(&g)
    };
    save_roles(snapshot).await;
    log::info!("role created: {}", role.name);
    HttpResponse::Ok().json(role)
}

#[put("/roles/{name}")]
async fn api_update_role(state: AppState, path: Path<NamePath>, body: Json<Role>) -> HttpResponse {
    let role = body.into_inner();
    let snapshot = {
        let mut g = match state.write() {
            Ok(guard) => guard,
            Err(_) => return lock_error(),
        };
        if let Err(e) = g.roles.update(&path.name, role.clone()) {
            return fit_error_response(&e);
        }
        roles_snapshot(&g)
    };
    save_roles(snapshot).await;
    HttpResponse::Ok().json(role)
}

#[delete("/roles/{name}")]
async fn api_delete_role(state: AppState, path: Path<NamePath>) -> HttpResponse {
    let (role, snapshot) = {
        let mut g = match state.write() {
            Ok(guard) => guard,
            Err(_) => return lock_error(),
        };
        match g.roles.remove(&path.name) {
            Ok(role) => (role, roles_snapshot(&g)),
            Err(e) => return fit_error_response(&e),
        }
    };
    save_roles(snapshot).await;
    HttpResponse::Ok().json(role)
}

#[get("/formations")]
async fn api_formations(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(serde_json::json!({ "formations": g.formations.names() }))
}

#[get("/formation/{name}")]
async fn api_formation(state: AppState, path: Path<NamePath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.formations.require(&path.name) {
        Ok(f) => HttpResponse::Ok().json(f),
        Err(e) => fit_error_response(&e),
    }
}

#[post("/formations")]
async fn api_create_formation(state: AppState, body: Json<FormationBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let built = match body.into_inner() {
        FormationBody::Canonical(f) => Formation::new(f.name, f.slots),
        FormationBody::Legacy(map) => match map.into_iter().next() {
            Some((name, role_map)) => Formation::from_role_map(name, &role_map, &g.roles),
            None => Err(FitError::InvalidFormation("no formation given".into())),
        },
    };
    let formation = match built {
        Ok(f) => f,
        Err(e) => return fit_error_response(&e),
    };
    match g.formations.insert(formation.clone()) {
        Ok(()) => HttpResponse::Ok().json(formation),
        Err(e) => fit_error_response(&e),
    }
}

#[put("/formations/{name}")]
async fn api_update_formation(
    state: AppState,
    path: Path<NamePath>,
    body: Json<FormationSlotsBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let slots = match body.into_inner() {
        FormationSlotsBody::Slots(slots) => Ok(slots),
        FormationSlotsBody::RoleMap(map) => {
            Formation::from_role_map(path.name.clone(), &map, &g.roles).map(|f| f.slots)
        }
    };
    let result = slots.and_then(|slots| g.formations.replace(&path.name, slots));
    match result {
        Ok(()) => match g.formations.get(&path.name) {
            Some(f) => HttpResponse::Ok().json(f),
            None => HttpResponse::NotFound().json(error_json("Formation not found")),
        },
        Err(e) => fit_error_response(&e),
    }
}

#[delete("/formations/{name}")]
async fn api_delete_formation(state: AppState, path: Path<NamePath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.formations.remove(&path.name) {
        Ok(f) => HttpResponse::Ok().json(f),
        Err(e) => fit_error_response(&e),
    }
}

/// Validate names and run the assigner over `pool`.
fn run_assignment(catalogs: &Catalogs, body: &AssignSquadBody, pool: &[Player]) -> Result<SquadSummary, FitError> {
    let tier = catalogs.tiers.require(&body.tier)?;
    let slots: Vec<SlotRole> = match body.formation_name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => catalogs
            .formations
            .require(name)?
            .resolve_roles(&body.role_map, &catalogs.roles)?,
        _ => SlotRole::from_role_map(&body.role_map, &catalogs.roles)?,
    };
    let assignment = assign_squad_with(body.policy, pool, &slots, tier);
    Ok(SquadSummary::from(&assignment))
}

/// Assign the whole owned pool to a formation.
#[post("/squad/assign")]
async fn api_assign_squad(state: AppState, services: AppServices, body: Json<AssignSquadBody>) -> HttpResponse {
    let pool = match services.players.owned_players().await {
        Ok(p) => p,
        Err(e) => return remote_error_response(&e),
    };
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match run_assignment(&g, &body, &pool) {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(e) => fit_error_response(&e),
    }
}

/// Assign an explicit list of players (e.g. a club roster).
#[post("/squads/simulate")]
async fn api_simulate_squad(state: AppState, services: AppServices, body: Json<SimulateBody>) -> HttpResponse {
    let pool = match services.players.players_by_ids(&body.player_ids).await {
        Ok(p) => p,
        Err(e) => return remote_error_response(&e),
    };
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match run_assignment(&g, &body.squad, &pool) {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(e) => fit_error_response(&e),
    }
}

#[get("/players/owned")]
async fn api_owned_players(state: AppState, services: AppServices) -> HttpResponse {
    let mut players = match services.players.owned_players().await {
        Ok(p) => p,
        Err(e) => return remote_error_response(&e),
    };
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    g.clubs.annotate(&mut players);
    HttpResponse::Ok().json(players)
}

#[post("/players/by_ids")]
async fn api_players_by_ids(state: AppState, services: AppServices, body: Json<PlayerIdsBody>) -> HttpResponse {
    let mut players = match services.players.players_by_ids(&body.player_ids).await {
        Ok(p) => p,
        Err(e) => return remote_error_response(&e),
    };
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    g.clubs.annotate(&mut players);
    HttpResponse::Ok().json(players)
}

/// Role fits for one owned player across every tier. `?tier=` must name a known tier if given.
#[get("/player/{id}/analysis")]
async fn api_player_analysis(
    state: AppState,
    services: AppServices,
    path: Path<PlayerPath>,
    query: Query<AnalysisQuery>,
) -> HttpResponse {
    let owned = match services.players.owned_players().await {
        Ok(p) => p,
        Err(e) => return remote_error_response(&e),
    };
    let player = match select_by_ids(owned, &[path.id]).into_iter().next() {
        Some(p) => p,
        None => return HttpResponse::NotFound().json(error_json("Player not found")),
    };
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    if let Some(tier) = &query.tier {
        if let Err(e) = g.tiers.require(tier) {
            return fit_error_response(&e);
        }
    }
    let analysis = analyze_player(&player, &g.roles, &g.tiers);
    let selected = query.tier.as_deref().map(|t| analysis.roles_at(t).to_vec());
    HttpResponse::Ok().json(serde_json::json!({
        "player": player,
        "best_tier": analysis.best_tier(),
        "analysis": analysis,
        "selected_tier_roles": selected,
    }))
}

#[get("/clubs")]
async fn api_clubs(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    HttpResponse::Ok().json(g.clubs.list())
}

#[post("/clubs")]
async fn api_create_club(state: AppState, body: Json<CreateClubBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    if let Err(e) = g.tiers.require(&body.tier) {
        return fit_error_response(&e);
    }
    if let Err(e) = g.clubs.create(&body.club_name, &body.tier) {
        return fit_error_response(&e);
    }
    if let Err(e) = g.clubs.set_roster(&body.club_name, body.roster.clone()) {
        return fit_error_response(&e);
    }
    log::info!("club created: {}", body.club_name.trim());
    match g.clubs.get(&body.club_name) {
        Some(club) => HttpResponse::Ok().json(club),
        None => HttpResponse::NotFound().json(error_json("Club not found")),
    }
}

#[get("/clubs/{name}")]
async fn api_get_club(state: AppState, path: Path<NamePath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.clubs.get(&path.name) {
        Some(club) => HttpResponse::Ok().json(club),
        None => fit_error_response(&FitError::UnknownClub(path.name.clone())),
    }
}

#[put("/clubs/{name}")]
async fn api_update_club(state: AppState, path: Path<NamePath>, body: Json<UpdateClubBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let (roster, tier) = match body.into_inner() {
        UpdateClubBody::Roster(r) => (Some(r), None),
        UpdateClubBody::Fields { roster, tier } => (roster, tier),
    };
    if let Some(tier) = tier {
        if let Err(e) = g.tiers.require(&tier) {
            return fit_error_response(&e);
        }
        if let Err(e) = g.clubs.set_tier(&path.name, &tier) {
            return fit_error_response(&e);
        }
    }
    if let Some(roster) = roster {
        if let Err(e) = g.clubs.set_roster(&path.name, roster) {
            return fit_error_response(&e);
        }
    }
    match g.clubs.get(&path.name) {
        Some(club) => HttpResponse::Ok().json(club),
        None => fit_error_response(&FitError::UnknownClub(path.name.clone())),
    }
}

#[delete("/clubs/{name}")]
async fn api_delete_club(state: AppState, path: Path<NamePath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.clubs.delete(&path.name) {
        Ok(club) => {
            log::info!("club deleted: {} ({} players released)", club.name, club.roster.len());
            HttpResponse::NoContent().finish()
        }
        Err(e) => fit_error_response(&e),
    }
}

/// Move one owned player between clubs ("Unassigned" on either side is allowed).
#[post("/players/assignment")]
async fn api_player_assignment(
    state: AppState,
    services: AppServices,
    body: Json<PlayerAssignmentBody>,
) -> HttpResponse {
    let owned = match services.players.owned_players().await {
        Ok(p) => p,
        Err(e) => return remote_error_response(&e),
    };
    let mut player = match select_by_ids(owned, &[body.player_id]).into_iter().next() {
        Some(p) => p,
        None => return HttpResponse::NotFound().json(error_json("Player not found")),
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    player.assigned_club = g.clubs.club_of(player.id).to_string();
    match g.clubs.move_player(&mut player, &body.old_club_name, &body.new_club_name) {
        Ok(()) => HttpResponse::Ok().json(player),
        Err(e) => fit_error_response(&e),
    }
}

/// Search the marketplace for players matching a role at a tier, cheapest first.
#[post("/market/search")]
async fn api_market_search(state: AppState, services: AppServices, body: Json<MarketSearchBody>) -> HttpResponse {
    let (role, tier) = {
        let g = match state.read() {
            Ok(guard) => guard,
            Err(_) => return lock_error(),
        };
        let role = match g.roles.require(&body.role_name) {
            Ok(r) => r.clone(),
            Err(e) => return fit_error_response(&e),
        };
        let tier = match g.tiers.require(&body.tier) {
            Ok(t) => t.clone(),
            Err(e) => return fit_error_response(&e),
        };
        (role, tier)
    };
    let query = MarketQuery::for_role(&role, &tier);
    match services.market.search(&query, &body.auth_token).await {
        Ok(listings) => HttpResponse::Ok().json(rank_listings(listings, &role, &tier)),
        Err(e) => remote_error_response(&e),
    }
}

/// Server settings from the environment.
struct ServerConfig {
    host: String,
    port: u16,
    roles_path: Option<PathBuf>,
    formations_path: Option<PathBuf>,
    players_api_url: String,
    owner_wallet: String,
    marketplace_api_url: String,
    static_dir: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

impl ServerConfig {
    fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| default_host()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or_else(default_port),
            roles_path: std::env::var("ROLES_PATH").ok().map(PathBuf::from),
            formations_path: std::env::var("FORMATIONS_PATH").ok().map(PathBuf::from),
            players_api_url: env_or(
                "PLAYERS_API_URL",
                "https://z519wdyajg.execute-api.us-east-1.amazonaws.com/prod/players",
            ),
            owner_wallet: env_or("OWNER_WALLET", ""),
            marketplace_api_url: env_or(
                "MARKETPLACE_API_URL",
                "https://z519wdyajg.execute-api.us-east-1.amazonaws.com/prod/listings",
            ),
            static_dir: env_or("STATIC_DIR", "static"),
        }
    }

    /// Load the catalogs. A configured file that fails to load aborts startup.
    fn load_catalogs(&self) -> Result<Catalogs, FitError> {
        let roles = match &self.roles_path {
            Some(path) => {
                let roles = RoleCatalog::load(path)?;
                log::info!("loaded {} roles from {}", roles.len(), path.display());
                roles
            }
            None => {
                log::warn!("ROLES_PATH not set; starting with an empty role catalog");
                RoleCatalog::default()
            }
        };
        let formations = match &self.formations_path {
            Some(path) => FormationCatalog::load(path)?,
            None => FormationCatalog::default(),
        };
        let writable_roles = self
            .roles_path
            .clone()
            .filter(|p| !p.extension().map(|e| e.eq_ignore_ascii_case("csv")).unwrap_or(false));
        Ok(Catalogs {
            roles,
            formations,
            tiers: TierTable::default(),
            clubs: ClubRegistry::new(),
            roles_path: writable_roles,
        })
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    let catalogs = config
        .load_catalogs()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    let client = http_client().map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    let state = Data::new(RwLock::new(catalogs));
    let services = Data::new(Services {
        players: PlayerApiClient::new(client.clone(), &config.players_api_url, &config.owner_wallet),
        market: MarketplaceClient::new(client, &config.marketplace_api_url),
    });

    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);
    let static_dir = config.static_dir.clone();

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(services.clone())
            .service(api_health)
            .service(favicon)
            .service(api_attributes)
            .service(api_tiers)
            .service(api_roles)
            .service(api_create_role)
            .service(api_update_role)
            .service(api_delete_role)
            .service(api_formations)
            .service(api_formation)
            .service(api_create_formation)
            .service(api_update_formation)
            .service(api_delete_formation)
            .service(api_assign_squad)
            .service(api_simulate_squad)
            .service(api_owned_players)
            .service(api_players_by_ids)
            .service(api_player_analysis)
            .service(api_clubs)
            .service(api_create_club)
            .service(api_get_club)
            .service(api_update_club)
            .service(api_delete_club)
            .service(api_player_assignment)
            .service(api_market_search)
            .service(Files::new("/static", static_dir.clone()).index_file("index.html"))
    })
    .bind(bind)?
    .run()
    .await
}
