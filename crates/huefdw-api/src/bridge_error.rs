// Bridge error codes
//
// The `type` field of a bridge `{"error": {...}}` entry, as documented in
// the Hue API error-message reference.

/// Known bridge error codes.
///
/// Unrecognised codes map to [`Other`](Self::Other) so a newer firmware
/// never turns a field failure into a parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum BridgeErrorKind {
    UnauthorizedUser,
    InvalidJson,
    ResourceNotAvailable,
    MethodNotAvailable,
    MissingParameters,
    ParameterNotAvailable,
    InvalidValue,
    ParameterNotModifiable,
    TooManyItems,
    PortalConnectionRequired,
    LinkButtonNotPressed,
    DhcpCannotBeDisabled,
    InvalidUpdateState,
    DeviceOff,
    GroupTableFull,
    DeviceGroupTableFull,
    DeviceUnreachable,
    GroupTypeNotUpdatable,
    SceneCreationInProgress,
    SceneBufferFull,
    SensorTypeNotAllowed,
    SensorListFull,
    RuleEngineFull,
    RuleConditionError,
    RuleActionError,
    RuleUnableToActivate,
    ScheduleListFull,
    ScheduleTimezoneInvalid,
    ScheduleTimeConflict,
    ScheduleTagInvalid,
    ScheduleExpired,
    InternalError,
    Other(u16),
}

impl BridgeErrorKind {
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => Self::UnauthorizedUser,
            2 => Self::InvalidJson,
            3 => Self::ResourceNotAvailable,
            4 => Self::MethodNotAvailable,
            5 => Self::MissingParameters,
            6 => Self::ParameterNotAvailable,
            7 => Self::InvalidValue,
            8 => Self::ParameterNotModifiable,
            11 => Self::TooManyItems,
            12 => Self::PortalConnectionRequired,
            101 => Self::LinkButtonNotPressed,
            110 => Self::DhcpCannotBeDisabled,
            111 => Self::InvalidUpdateState,
            201 => Self::DeviceOff,
            301 => Self::GroupTableFull,
            302 => Self::DeviceGroupTableFull,
            304 => Self::DeviceUnreachable,
            305 => Self::GroupTypeNotUpdatable,
            401 => Self::SceneCreationInProgress,
            402 => Self::SceneBufferFull,
            501 => Self::SensorTypeNotAllowed,
            502 => Self::SensorListFull,
            601 => Self::RuleEngineFull,
            607 => Self::RuleConditionError,
            608 => Self::RuleActionError,
            609 => Self::RuleUnableToActivate,
            701 => Self::ScheduleListFull,
            702 => Self::ScheduleTimezoneInvalid,
            703 => Self::ScheduleTimeConflict,
            704 => Self::ScheduleTagInvalid,
            705 => Self::ScheduleExpired,
            901 => Self::InternalError,
            other => Self::Other(other),
        }
    }

    pub fn code(self) -> u16 {
        match self {
            Self::UnauthorizedUser => 1,
            Self::InvalidJson => 2,
            Self::ResourceNotAvailable => 3,
            Self::MethodNotAvailable => 4,
            Self::MissingParameters => 5,
            Self::ParameterNotAvailable => 6,
            Self::InvalidValue => 7,
            Self::ParameterNotModifiable => 8,
            Self::TooManyItems => 11,
            Self::PortalConnectionRequired => 12,
            Self::LinkButtonNotPressed => 101,
            Self::DhcpCannotBeDisabled => 110,
            Self::InvalidUpdateState => 111,
            Self::DeviceOff => 201,
            Self::GroupTableFull => 301,
            Self::DeviceGroupTableFull => 302,
            Self::DeviceUnreachable => 304,
            Self::GroupTypeNotUpdatable => 305,
            Self::SceneCreationInProgress => 401,
            Self::SceneBufferFull => 402,
            Self::SensorTypeNotAllowed => 501,
            Self::SensorListFull => 502,
            Self::RuleEngineFull => 601,
            Self::RuleConditionError => 607,
            Self::RuleActionError => 608,
            Self::RuleUnableToActivate => 609,
            Self::ScheduleListFull => 701,
            Self::ScheduleTimezoneInvalid => 702,
            Self::ScheduleTimeConflict => 703,
            Self::ScheduleTagInvalid => 704,
            Self::ScheduleExpired => 705,
            Self::InternalError => 901,
            Self::Other(code) => code,
        }
    }

    /// Short human-readable summary of the code.
    pub fn summary(self) -> &'static str {
        match self {
            Self::UnauthorizedUser => "unauthorized user",
            Self::InvalidJson => "body contains invalid JSON",
            Self::ResourceNotAvailable => "resource not available",
            Self::MethodNotAvailable => "method not available for resource",
            Self::MissingParameters => "missing parameters in body",
            Self::ParameterNotAvailable => "parameter not available",
            Self::InvalidValue => "invalid value for parameter",
            Self::ParameterNotModifiable => "parameter is not modifiable",
            Self::TooManyItems => "too many items in list",
            Self::PortalConnectionRequired => "portal connection required",
            Self::LinkButtonNotPressed => "link button not pressed",
            Self::DhcpCannotBeDisabled => "DHCP cannot be disabled",
            Self::InvalidUpdateState => "invalid updatestate",
            Self::DeviceOff => "parameter is not modifiable, device is set to off",
            Self::GroupTableFull => "group table is full",
            Self::DeviceGroupTableFull => "device group table is full",
            Self::DeviceUnreachable => "device is unreachable",
            Self::GroupTypeNotUpdatable => "group of this type cannot be updated or deleted",
            Self::SceneCreationInProgress => "scene creation in progress",
            Self::SceneBufferFull => "scene buffer in bridge full",
            Self::SensorTypeNotAllowed => "sensor type cannot be created",
            Self::SensorListFull => "sensor list is full",
            Self::RuleEngineFull => "rule engine full",
            Self::RuleConditionError => "rule condition error",
            Self::RuleActionError => "rule action error",
            Self::RuleUnableToActivate => "rule unable to activate",
            Self::ScheduleListFull => "schedule list is full",
            Self::ScheduleTimezoneInvalid => "schedule time-zone not valid",
            Self::ScheduleTimeConflict => "schedule cannot set time and local time",
            Self::ScheduleTagInvalid => "cannot create schedule, invalid tag",
            Self::ScheduleExpired => "cannot enable schedule, time is in the past",
            Self::InternalError => "internal bridge error",
            Self::Other(_) => "unknown bridge error",
        }
    }

    /// Errors that may clear up without changing the request.
    pub fn is_transient(self) -> bool {
        matches!(
            self,
            Self::DeviceUnreachable
                | Self::SceneCreationInProgress
                | Self::SceneBufferFull
                | Self::PortalConnectionRequired
                | Self::LinkButtonNotPressed
                | Self::InternalError
        )
    }
}

impl std::fmt::Display for BridgeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.summary(), self.code())
    }
}
