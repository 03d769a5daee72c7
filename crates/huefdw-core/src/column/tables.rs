// Static column tables, one per resource kind.
//
// Order here is the default column order of a row.

use super::{Coercion, ColumnSpec};
use crate::kind::ResourceKind;

const INT: Coercion = Coercion::Integer;
const BOOL: Coercion = Coercion::Boolean;
const KV: Coercion = Coercion::KeyValue;

static LIGHTS: &[ColumnSpec] = &[
    ColumnSpec::key("light_id").coerce(INT),
    ColumnSpec::path("light_name", "name"),
    ColumnSpec::path("is_on", "state.on").coerce(BOOL).mutable(),
    ColumnSpec::path("hue", "state.hue").coerce(INT).mutable(),
    ColumnSpec::path("color_mode", "state.colormode"),
    ColumnSpec::path("effect", "state.effect").mutable(),
    ColumnSpec::path("alert", "state.alert").mutable(),
    ColumnSpec::path("xy", "state.xy").mutable(),
    ColumnSpec::path("reachable", "state.reachable").coerce(BOOL),
    ColumnSpec::path("brightness", "state.bri").coerce(INT).mutable(),
    ColumnSpec::path("saturation", "state.sat").coerce(INT).mutable(),
    ColumnSpec::path("color_temperature", "state.ct").coerce(INT).mutable(),
    ColumnSpec::path("software_version", "swversion"),
    ColumnSpec::path("unique_id", "uniqueid"),
    ColumnSpec::path("model_id", "modelid"),
    ColumnSpec::path("light_type", "type"),
    ColumnSpec::path("pointsymbol", "pointsymbol").coerce(KV),
];

static SENSORS: &[ColumnSpec] = &[
    ColumnSpec::key("sensor_id").coerce(INT),
    ColumnSpec::path("sensor_type", "type"),
    ColumnSpec::path("sensor_name", "name"),
    ColumnSpec::path("manufacturer", "manufacturername"),
    ColumnSpec::path("model_id", "modelid"),
    ColumnSpec::path("software_version", "swversion"),
    ColumnSpec::path("unique_id", "uniqueid"),
    ColumnSpec::path("config", "config").coerce(KV),
    ColumnSpec::path("state", "state").coerce(KV),
];

static SCENES: &[ColumnSpec] = &[
    ColumnSpec::key("scene_id"),
    ColumnSpec::path("scene_name", "name").mutable(),
    ColumnSpec::path("lights", "lights").coerce(KV).mutable(),
    ColumnSpec::path("owner", "owner"),
    ColumnSpec::path("recycle", "recycle").coerce(BOOL),
    ColumnSpec::path("locked", "locked").coerce(BOOL),
    ColumnSpec::path("app_data", "appdata").coerce(KV),
    ColumnSpec::path("picture", "picture"),
    ColumnSpec::path("last_updated", "lastupdated"),
    ColumnSpec::path("version", "version").coerce(INT),
];

// `config` has no key; its row id is the bridge name.
static CONFIG: &[ColumnSpec] = &[
    ColumnSpec::path("name", "name").mutable(),
    ColumnSpec::path("software_version", "swversion"),
    ColumnSpec::path("software_update", "swupdate").coerce(KV).mutable(),
    ColumnSpec::path("api_version", "apiversion"),
    ColumnSpec::path("link_button", "linkbutton").coerce(BOOL).mutable(),
    ColumnSpec::path("zigbee_channel", "zigbeechannel").coerce(INT),
    ColumnSpec::path("utc", "UTC"),
    ColumnSpec::path("timezone", "timezone").mutable(),
    ColumnSpec::path("local_time", "localtime"),
    ColumnSpec::path("portal_state", "portalstate").coerce(KV),
    ColumnSpec::path("portal_connection", "portalconnection"),
    ColumnSpec::path("portal_services", "portalservices").coerce(BOOL),
    ColumnSpec::path("dhcp", "dhcp").coerce(BOOL).mutable(),
    ColumnSpec::path("mac", "mac"),
    ColumnSpec::path("ip_address", "ipaddress").mutable(),
    ColumnSpec::path("netmask", "netmask").mutable(),
    ColumnSpec::path("gateway", "gateway").mutable(),
    ColumnSpec::path("proxy_address", "proxyaddress").mutable(),
    ColumnSpec::path("proxy_port", "proxyport").coerce(INT).mutable(),
    ColumnSpec::path("whitelist", "whitelist").coerce(KV),
];

pub(super) fn table(kind: ResourceKind) -> &'static [ColumnSpec] {
    match kind {
        ResourceKind::Lights => LIGHTS,
        ResourceKind::Sensors => SENSORS,
        ResourceKind::Scenes => SCENES,
        ResourceKind::Config => CONFIG,
    }
}
