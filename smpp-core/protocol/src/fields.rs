//! 字段描述表
//!
//! 每种 PDU 一行：按线上顺序排列的必选字段 + 按输出顺序排列的可选 TLV。
//! 脚本编译、PDU 编解码和日志字段转储都只遍历这张表。

use crate::MessageType;

/// 字段标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldId {
    // 必选字段
    SystemId,
    Password,
    SystemType,
    InterfaceVersion,
    AddrTon,
    AddrNpi,
    AddressRange,
    MessageId,
    SourceAddrTon,
    SourceAddrNpi,
    SourceAddr,
    DestAddrTon,
    DestAddrNpi,
    DestinationAddr,
    FinalDate,
    MessageState,
    ErrorCode,
    ServiceType,
    EsmClass,
    ProtocolId,
    PriorityFlag,
    ScheduleDeliveryTime,
    ValidityPeriod,
    RegisteredDelivery,
    ReplaceIfPresentFlag,
    DataCoding,
    SmDefaultMsgId,
    ShortMessage,
    DestAddresses,
    UnsuccessSmes,
    EsmeAddrTon,
    EsmeAddrNpi,
    EsmeAddr,

    // 可选字段 (TLV)
    ScInterfaceVersion,
    UserMessageReference,
    SourcePort,
    SourceAddrSubunit,
    DestinationPort,
    DestAddrSubunit,
    SarMsgRefNum,
    SarTotalSegments,
    SarSegmentSeqnum,
    MoreMessagesToSend,
    PayloadType,
    MessagePayload,
    PrivacyIndicator,
    CallbackNum,
    CallbackNumPresInd,
    CallbackNumAtag,
    SourceSubaddress,
    DestSubaddress,
    UserResponseCode,
    DisplayTime,
    SmsSignal,
    MsValidity,
    MsMsgWaitFacilities,
    NumberOfMessages,
    AlertOnMsgDelivery,
    LanguageIndicator,
    ItsReplyType,
    ItsSessionInfo,
    UssdServiceOp,
    NetworkErrorCode,
    MessageStateOption,
    ReceiptedMessageId,
    SourceNetworkType,
    SourceBearerType,
    SourceTelematicsId,
    DestNetworkType,
    DestBearerType,
    DestTelematicsId,
    QosTimeToLive,
    SetDpf,
    DeliveryFailureReason,
    AdditionalStatusInfoText,
    DpfResult,
    MsAvailabilityStatus,
}

/// 必选字段类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// C-Octet String，`max` 含结尾 NUL
    CString { max: usize },
    /// 单字节整数
    Integer { default: u8 },
    /// sm_length + short_message
    ShortMessage,
    /// number_of_dests + dest_address 列表 (submit_multi)
    DestinationList,
    /// no_unsuccess + unsuccess_sme 列表 (submit_multi_resp)
    UnsuccessList,
}

/// 必选字段描述
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub id: FieldId,
    /// 日志中的键名
    pub label: &'static str,
    /// 脚本中可用的元素名，第一个为首选
    pub elements: &'static [&'static str],
    pub kind: FieldKind,
    /// 脚本中必须出现
    pub required: bool,
}

impl FieldSpec {
    const fn cstr(
        id: FieldId,
        label: &'static str,
        elements: &'static [&'static str],
        max: usize,
    ) -> Self {
        Self {
            id,
            label,
            elements,
            kind: FieldKind::CString { max },
            required: false,
        }
    }

    const fn int(id: FieldId, label: &'static str, elements: &'static [&'static str]) -> Self {
        Self {
            id,
            label,
            elements,
            kind: FieldKind::Integer { default: 0 },
            required: false,
        }
    }

    const fn special(
        id: FieldId,
        label: &'static str,
        elements: &'static [&'static str],
        kind: FieldKind,
    ) -> Self {
        Self {
            id,
            label,
            elements,
            kind,
            required: false,
        }
    }

    const fn with_default(self, default: u8) -> Self {
        Self {
            kind: FieldKind::Integer { default },
            ..self
        }
    }

    const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }

    /// 首选元素名
    pub fn element(&self) -> &'static str {
        self.elements[0]
    }

    pub fn accepts(&self, element: &str) -> bool {
        self.elements.contains(&element)
    }
}

/// TLV 值类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlvKind {
    U8,
    U16,
    U32,
    CString,
    Octets,
    /// 零长度，出现即为真
    Flag,
    /// network_type (1) + error_code (2)
    NetworkError,
}

/// 可选字段描述
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TlvSpec {
    pub id: FieldId,
    pub tag: u16,
    pub label: &'static str,
    pub element: &'static str,
    pub kind: TlvKind,
    /// 未实现的字段在脚本中出现即为编译错误；解码时按原始字节保留
    pub implemented: bool,
}

impl TlvSpec {
    const fn new(
        id: FieldId,
        tag: u16,
        label: &'static str,
        element: &'static str,
        kind: TlvKind,
    ) -> Self {
        Self {
            id,
            tag,
            label,
            element,
            kind,
            implemented: true,
        }
    }

    const fn unimplemented(self) -> Self {
        Self {
            implemented: false,
            ..self
        }
    }
}

/// 一种 PDU 的字段布局
#[derive(Debug)]
pub struct MessageLayout {
    pub message_type: MessageType,
    pub mandatory: &'static [FieldSpec],
    pub optional: &'static [TlvSpec],
    /// 整个 PDU 尚未支持时的说明
    pub unsupported: Option<&'static str>,
}

impl MessageLayout {
    const fn new(
        message_type: MessageType,
        mandatory: &'static [FieldSpec],
        optional: &'static [TlvSpec],
    ) -> Self {
        Self {
            message_type,
            mandatory,
            optional,
            unsupported: None,
        }
    }

    const fn unsupported(self, reason: &'static str) -> Self {
        Self {
            unsupported: Some(reason),
            ..self
        }
    }

    pub fn mandatory_field(&self, id: FieldId) -> Option<&'static FieldSpec> {
        self.mandatory.iter().find(|f| f.id == id)
    }

    pub fn optional_field(&self, id: FieldId) -> Option<&'static TlvSpec> {
        self.optional.iter().find(|t| t.id == id)
    }

    pub fn tlv_by_tag(&self, tag: u16) -> Option<&'static TlvSpec> {
        self.optional.iter().find(|t| t.tag == tag)
    }

    pub fn is_supported(&self) -> bool {
        self.unsupported.is_none()
    }
}

// ---- 必选字段 ----

const SYSTEM_ID: FieldSpec = FieldSpec::cstr(FieldId::SystemId, "SystemID", &["SystemId"], 16);
const PASSWORD: FieldSpec = FieldSpec::cstr(FieldId::Password, "Password", &["Password"], 9);
const SYSTEM_TYPE: FieldSpec =
    FieldSpec::cstr(FieldId::SystemType, "SystemType", &["SystemType"], 13);
const INTERFACE_VERSION: FieldSpec =
    FieldSpec::int(FieldId::InterfaceVersion, "InterfaceVersion", &["InterfaceVersion"])
        .with_default(0x34);
const ADDR_TON: FieldSpec = FieldSpec::int(FieldId::AddrTon, "AddrTON", &["AddrTON"]);
const ADDR_NPI: FieldSpec = FieldSpec::int(FieldId::AddrNpi, "AddrNPI", &["AddrNPI"]);
const ADDRESS_RANGE: FieldSpec =
    FieldSpec::cstr(FieldId::AddressRange, "AddressRange", &["AddressRange"], 41);
const MESSAGE_ID: FieldSpec = FieldSpec::cstr(FieldId::MessageId, "MessageID", &["MessageId"], 65);
const SOURCE_ADDR_TON: FieldSpec = FieldSpec::int(
    FieldId::SourceAddrTon,
    "SourceAddrTON",
    &["SourceAddrTON", "AddrTON"],
);
const SOURCE_ADDR_NPI: FieldSpec = FieldSpec::int(
    FieldId::SourceAddrNpi,
    "SourceAddrNPI",
    &["SourceAddrNPI", "AddrNPI"],
);
const SOURCE_ADDR: FieldSpec =
    FieldSpec::cstr(FieldId::SourceAddr, "SourceAddr", &["SourceAddr"], 21);
const SOURCE_ADDR_LONG: FieldSpec =
    FieldSpec::cstr(FieldId::SourceAddr, "SourceAddr", &["SourceAddr"], 65);
const DEST_ADDR_TON: FieldSpec =
    FieldSpec::int(FieldId::DestAddrTon, "DestAddrTON", &["DestAddrTON"]);
const DEST_ADDR_NPI: FieldSpec =
    FieldSpec::int(FieldId::DestAddrNpi, "DestAddrNPI", &["DestAddrNPI"]);
const DESTINATION_ADDR: FieldSpec = FieldSpec::cstr(
    FieldId::DestinationAddr,
    "DestinationAddr",
    &["DestinationAddr"],
    21,
);
const DESTINATION_ADDR_LONG: FieldSpec = FieldSpec::cstr(
    FieldId::DestinationAddr,
    "DestinationAddr",
    &["DestinationAddr"],
    65,
);
const FINAL_DATE: FieldSpec = FieldSpec::cstr(FieldId::FinalDate, "FinalDate", &["FinalDate"], 17);
const MESSAGE_STATE: FieldSpec =
    FieldSpec::int(FieldId::MessageState, "MessageState", &["MessageState"]);
const ERROR_CODE: FieldSpec = FieldSpec::int(FieldId::ErrorCode, "ErrorCode", &["ErrorCode"]);
const SERVICE_TYPE: FieldSpec =
    FieldSpec::cstr(FieldId::ServiceType, "ServiceType", &["ServiceType"], 6);
const ESM_CLASS: FieldSpec = FieldSpec::int(FieldId::EsmClass, "EsmClass", &["EsmClass"]);
const PROTOCOL_ID: FieldSpec = FieldSpec::int(FieldId::ProtocolId, "ProtocolID", &["ProtocolId"]);
const PRIORITY_FLAG: FieldSpec =
    FieldSpec::int(FieldId::PriorityFlag, "PriorityFlag", &["PriorityFlag"]);
const SCHEDULE_DELIVERY_TIME: FieldSpec = FieldSpec::cstr(
    FieldId::ScheduleDeliveryTime,
    "ScheduleDeliveryTime",
    &["ScheduleDeliveryTime"],
    17,
);
const VALIDITY_PERIOD: FieldSpec =
    FieldSpec::cstr(FieldId::ValidityPeriod, "ValidityPeriod", &["ValidityPeriod"], 17);
const REGISTERED_DELIVERY: FieldSpec = FieldSpec::int(
    FieldId::RegisteredDelivery,
    "RegisteredDelivery",
    &["RegisteredDelivery"],
);
const REPLACE_IF_PRESENT_FLAG: FieldSpec = FieldSpec::int(
    FieldId::ReplaceIfPresentFlag,
    "ReplaceIfPresentFlag",
    &["ReplaceIfPresentFlag"],
);
const DATA_CODING: FieldSpec = FieldSpec::int(FieldId::DataCoding, "DataCoding", &["DataCoding"]);
const SM_DEFAULT_MSG_ID: FieldSpec =
    FieldSpec::int(FieldId::SmDefaultMsgId, "SmDefaultMsgID", &["SmDefaultMsgId"]);
const SHORT_MESSAGE: FieldSpec = FieldSpec::special(
    FieldId::ShortMessage,
    "ShortMessage",
    &["ShortMessage"],
    FieldKind::ShortMessage,
);
const DEST_ADDRESSES: FieldSpec = FieldSpec::special(
    FieldId::DestAddresses,
    "DestAddresses",
    &["DestinationAddresses"],
    FieldKind::DestinationList,
)
.required();
const UNSUCCESS_SMES: FieldSpec = FieldSpec::special(
    FieldId::UnsuccessSmes,
    "UnsuccessSme",
    &["UnsuccessSmes"],
    FieldKind::UnsuccessList,
);
const ESME_ADDR_TON: FieldSpec =
    FieldSpec::int(FieldId::EsmeAddrTon, "EsmeAddrTON", &["EsmeAddrTON"]);
const ESME_ADDR_NPI: FieldSpec =
    FieldSpec::int(FieldId::EsmeAddrNpi, "EsmeAddrNPI", &["EsmeAddrNPI"]);
const ESME_ADDR: FieldSpec = FieldSpec::cstr(FieldId::EsmeAddr, "EsmeAddr", &["EsmeAddr"], 65);

// ---- 可选字段 ----

const SC_INTERFACE_VERSION: TlvSpec = TlvSpec::new(
    FieldId::ScInterfaceVersion,
    0x0210,
    "ScInterfaceVersion",
    "ScInterfaceVersion",
    TlvKind::U8,
);
const USER_MESSAGE_REFERENCE: TlvSpec = TlvSpec::new(
    FieldId::UserMessageReference,
    0x0204,
    "UserMessageReference",
    "UserMessageReference",
    TlvKind::U16,
);
const SOURCE_PORT: TlvSpec =
    TlvSpec::new(FieldId::SourcePort, 0x020A, "SourcePort", "SourcePort", TlvKind::U16);
const SOURCE_ADDR_SUBUNIT: TlvSpec = TlvSpec::new(
    FieldId::SourceAddrSubunit,
    0x000D,
    "SourceAddrSubunit",
    "SourceAddrSubunit",
    TlvKind::U8,
);
const DESTINATION_PORT: TlvSpec = TlvSpec::new(
    FieldId::DestinationPort,
    0x020B,
    "DestinationPort",
    "DestinationPort",
    TlvKind::U16,
);
const DEST_ADDR_SUBUNIT: TlvSpec = TlvSpec::new(
    FieldId::DestAddrSubunit,
    0x0005,
    "DestAddrSubunit",
    "DestAddrSubunit",
    TlvKind::U8,
);
const SAR_MSG_REF_NUM: TlvSpec = TlvSpec::new(
    FieldId::SarMsgRefNum,
    0x020C,
    "SarMsgRefNum",
    "SarMsgRefNum",
    TlvKind::U16,
);
const SAR_TOTAL_SEGMENTS: TlvSpec = TlvSpec::new(
    FieldId::SarTotalSegments,
    0x020E,
    "SarTotalSegments",
    "SarTotalSegments",
    TlvKind::U8,
);
const SAR_SEGMENT_SEQNUM: TlvSpec = TlvSpec::new(
    FieldId::SarSegmentSeqnum,
    0x020F,
    "SarSegmentSeqNum",
    "SarSegmentSeqnum",
    TlvKind::U8,
);
const MORE_MESSAGES_TO_SEND: TlvSpec = TlvSpec::new(
    FieldId::MoreMessagesToSend,
    0x0426,
    "MoreMessagesToSend",
    "MoreMsgsToSend",
    TlvKind::U8,
);
const PAYLOAD_TYPE: TlvSpec =
    TlvSpec::new(FieldId::PayloadType, 0x0019, "PayloadType", "PayloadType", TlvKind::U8);
const MESSAGE_PAYLOAD: TlvSpec = TlvSpec::new(
    FieldId::MessagePayload,
    0x0424,
    "MessagePayload",
    "MessagePayload",
    TlvKind::Octets,
);
const PRIVACY_INDICATOR: TlvSpec = TlvSpec::new(
    FieldId::PrivacyIndicator,
    0x0201,
    "PrivacyIndicator",
    "PrivacyIndicator",
    TlvKind::U8,
);
const CALLBACK_NUM: TlvSpec =
    TlvSpec::new(FieldId::CallbackNum, 0x0381, "CallbackNum", "CallBackNum", TlvKind::Octets)
        .unimplemented();
const CALLBACK_NUM_PRES_IND: TlvSpec = TlvSpec::new(
    FieldId::CallbackNumPresInd,
    0x0302,
    "CallbackNumPresInd",
    "CallbackNumPresInd",
    TlvKind::U8,
);
const CALLBACK_NUM_ATAG: TlvSpec = TlvSpec::new(
    FieldId::CallbackNumAtag,
    0x0303,
    "CallbackNumAtag",
    "CallBackNumATag",
    TlvKind::Octets,
)
.unimplemented();
const SOURCE_SUBADDRESS: TlvSpec = TlvSpec::new(
    FieldId::SourceSubaddress,
    0x0202,
    "SourceSubaddress",
    "SourceSubaddress",
    TlvKind::Octets,
)
.unimplemented();
const DEST_SUBADDRESS: TlvSpec = TlvSpec::new(
    FieldId::DestSubaddress,
    0x0203,
    "DestSubaddress",
    "DestSubaddress",
    TlvKind::Octets,
)
.unimplemented();
const USER_RESPONSE_CODE: TlvSpec = TlvSpec::new(
    FieldId::UserResponseCode,
    0x0205,
    "UserResponseCode",
    "UserResponseCode",
    TlvKind::U8,
);
const DISPLAY_TIME: TlvSpec =
    TlvSpec::new(FieldId::DisplayTime, 0x1201, "DisplayTime", "DisplayTime", TlvKind::U8);
const SMS_SIGNAL: TlvSpec =
    TlvSpec::new(FieldId::SmsSignal, 0x1203, "SmsSignal", "SmsSignal", TlvKind::U16);
const MS_VALIDITY: TlvSpec =
    TlvSpec::new(FieldId::MsValidity, 0x1204, "MsValidity", "MsValidity", TlvKind::U8);
const MS_MSG_WAIT_FACILITIES: TlvSpec = TlvSpec::new(
    FieldId::MsMsgWaitFacilities,
    0x0030,
    "MsMsgWaitFacilities",
    "MsMsgWaitFacilities",
    TlvKind::U8,
);
const NUMBER_OF_MESSAGES: TlvSpec = TlvSpec::new(
    FieldId::NumberOfMessages,
    0x0304,
    "NumberOfMessages",
    "NumberOfMessages",
    TlvKind::U8,
);
const ALERT_ON_MSG_DELIVERY: TlvSpec = TlvSpec::new(
    FieldId::AlertOnMsgDelivery,
    0x130C,
    "AlertOnMsgDelivery",
    "AlertOnMsgDelivery",
    TlvKind::Flag,
);
const LANGUAGE_INDICATOR: TlvSpec = TlvSpec::new(
    FieldId::LanguageIndicator,
    0x020D,
    "LanguageIndicator",
    "LanguageIndicator",
    TlvKind::U8,
);
const ITS_REPLY_TYPE: TlvSpec =
    TlvSpec::new(FieldId::ItsReplyType, 0x1380, "ItsReplyType", "ItsReplyType", TlvKind::U8);
const ITS_SESSION_INFO: TlvSpec = TlvSpec::new(
    FieldId::ItsSessionInfo,
    0x1383,
    "ItsSessionInfo",
    "ItsSessionInfo",
    TlvKind::U16,
);
const USSD_SERVICE_OP: TlvSpec =
    TlvSpec::new(FieldId::UssdServiceOp, 0x0501, "UssdServiceOp", "UssdServiceOp", TlvKind::U8);
const NETWORK_ERROR_CODE: TlvSpec = TlvSpec::new(
    FieldId::NetworkErrorCode,
    0x0423,
    "NetworkErrorCode",
    "NetworkErrorCode",
    TlvKind::NetworkError,
);
const MESSAGE_STATE_OPTION: TlvSpec = TlvSpec::new(
    FieldId::MessageStateOption,
    0x0427,
    "MessageState",
    "MessageState",
    TlvKind::U8,
);
const RECEIPTED_MESSAGE_ID: TlvSpec = TlvSpec::new(
    FieldId::ReceiptedMessageId,
    0x001E,
    "ReceiptedMessageID",
    "ReceiptedMessageId",
    TlvKind::CString,
);
const SOURCE_NETWORK_TYPE: TlvSpec = TlvSpec::new(
    FieldId::SourceNetworkType,
    0x000E,
    "SourceNetworkType",
    "SourceNetworkType",
    TlvKind::U8,
);
const SOURCE_BEARER_TYPE: TlvSpec = TlvSpec::new(
    FieldId::SourceBearerType,
    0x000F,
    "SourceBearerType",
    "SourceBearerType",
    TlvKind::U8,
);
const SOURCE_TELEMATICS_ID: TlvSpec = TlvSpec::new(
    FieldId::SourceTelematicsId,
    0x0010,
    "SourceTelematicsID",
    "SourceTelematicsId",
    TlvKind::U16,
);
const DEST_NETWORK_TYPE: TlvSpec = TlvSpec::new(
    FieldId::DestNetworkType,
    0x0006,
    "DestNetworkType",
    "DestNetworkType",
    TlvKind::U8,
);
const DEST_BEARER_TYPE: TlvSpec = TlvSpec::new(
    FieldId::DestBearerType,
    0x0007,
    "DestBearerType",
    "DestBearerType",
    TlvKind::U8,
);
const DEST_TELEMATICS_ID: TlvSpec = TlvSpec::new(
    FieldId::DestTelematicsId,
    0x0008,
    "DestTelematicsID",
    "DestTelematicsId",
    TlvKind::U16,
);
const QOS_TIME_TO_LIVE: TlvSpec = TlvSpec::new(
    FieldId::QosTimeToLive,
    0x0017,
    "QosTimeToLive",
    "QosTimeToLive",
    TlvKind::U32,
);
const SET_DPF: TlvSpec = TlvSpec::new(FieldId::SetDpf, 0x0421, "SetDpf", "SetDpf", TlvKind::U8);
const DELIVERY_FAILURE_REASON: TlvSpec = TlvSpec::new(
    FieldId::DeliveryFailureReason,
    0x0425,
    "DeliveryFailureReason",
    "DeliveryFailureReason",
    TlvKind::U8,
);
const ADDITIONAL_STATUS_INFO_TEXT: TlvSpec = TlvSpec::new(
    FieldId::AdditionalStatusInfoText,
    0x001D,
    "AdditionalStatusInfoText",
    "AdditionalStatusInfoText",
    TlvKind::CString,
);
const DPF_RESULT: TlvSpec =
    TlvSpec::new(FieldId::DpfResult, 0x0420, "DpfResult", "DpfResult", TlvKind::U8);
const MS_AVAILABILITY_STATUS: TlvSpec = TlvSpec::new(
    FieldId::MsAvailabilityStatus,
    0x0422,
    "MsAvailabilityStatus",
    "MsAvailabilityStatus",
    TlvKind::U8,
)
.unimplemented();

// ---- 每种 PDU 的字段列表 ----

const NO_FIELDS: &[FieldSpec] = &[];
const NO_TLVS: &[TlvSpec] = &[];

const BIND_FIELDS: &[FieldSpec] = &[
    SYSTEM_ID,
    PASSWORD,
    SYSTEM_TYPE,
    INTERFACE_VERSION,
    ADDR_TON,
    ADDR_NPI,
    ADDRESS_RANGE,
];
const BIND_RESP_FIELDS: &[FieldSpec] = &[SYSTEM_ID];
const BIND_RESP_TLVS: &[TlvSpec] = &[SC_INTERFACE_VERSION];
const OUTBIND_FIELDS: &[FieldSpec] = &[SYSTEM_ID, PASSWORD];
const MESSAGE_ID_FIELDS: &[FieldSpec] = &[MESSAGE_ID];

const QUERY_SM_FIELDS: &[FieldSpec] = &[MESSAGE_ID, SOURCE_ADDR_TON, SOURCE_ADDR_NPI, SOURCE_ADDR];
const QUERY_SM_RESP_FIELDS: &[FieldSpec] = &[MESSAGE_ID, FINAL_DATE, MESSAGE_STATE, ERROR_CODE];

const SUBMIT_SM_FIELDS: &[FieldSpec] = &[
    SERVICE_TYPE,
    SOURCE_ADDR_TON,
    SOURCE_ADDR_NPI,
    SOURCE_ADDR,
    DEST_ADDR_TON,
    DEST_ADDR_NPI,
    DESTINATION_ADDR,
    ESM_CLASS,
    PROTOCOL_ID,
    PRIORITY_FLAG,
    SCHEDULE_DELIVERY_TIME,
    VALIDITY_PERIOD,
    REGISTERED_DELIVERY,
    REPLACE_IF_PRESENT_FLAG,
    DATA_CODING,
    SM_DEFAULT_MSG_ID,
    SHORT_MESSAGE,
];
const SUBMIT_SM_TLVS: &[TlvSpec] = &[
    USER_MESSAGE_REFERENCE,
    SOURCE_PORT,
    SOURCE_ADDR_SUBUNIT,
    DESTINATION_PORT,
    DEST_ADDR_SUBUNIT,
    SAR_MSG_REF_NUM,
    SAR_TOTAL_SEGMENTS,
    SAR_SEGMENT_SEQNUM,
    MORE_MESSAGES_TO_SEND,
    PAYLOAD_TYPE,
    MESSAGE_PAYLOAD,
    PRIVACY_INDICATOR,
    CALLBACK_NUM,
    CALLBACK_NUM_PRES_IND,
    CALLBACK_NUM_ATAG,
    SOURCE_SUBADDRESS,
    DEST_SUBADDRESS,
    USER_RESPONSE_CODE,
    DISPLAY_TIME,
    SMS_SIGNAL,
    MS_VALIDITY,
    MS_MSG_WAIT_FACILITIES,
    NUMBER_OF_MESSAGES,
    ALERT_ON_MSG_DELIVERY,
    LANGUAGE_INDICATOR,
    ITS_REPLY_TYPE,
    ITS_SESSION_INFO,
    USSD_SERVICE_OP,
];

const SUBMIT_MULTI_FIELDS: &[FieldSpec] = &[
    SERVICE_TYPE,
    SOURCE_ADDR_TON,
    SOURCE_ADDR_NPI,
    SOURCE_ADDR,
    DEST_ADDRESSES,
    ESM_CLASS,
    PROTOCOL_ID,
    PRIORITY_FLAG,
    SCHEDULE_DELIVERY_TIME,
    VALIDITY_PERIOD,
    REGISTERED_DELIVERY,
    REPLACE_IF_PRESENT_FLAG,
    DATA_CODING,
    SM_DEFAULT_MSG_ID,
    SHORT_MESSAGE,
];
const SUBMIT_MULTI_TLVS: &[TlvSpec] = &[
    USER_MESSAGE_REFERENCE,
    SOURCE_PORT,
    SOURCE_ADDR_SUBUNIT,
    DESTINATION_PORT,
    DEST_ADDR_SUBUNIT,
    SAR_MSG_REF_NUM,
    SAR_TOTAL_SEGMENTS,
    SAR_SEGMENT_SEQNUM,
    PAYLOAD_TYPE,
    MESSAGE_PAYLOAD,
    PRIVACY_INDICATOR,
    CALLBACK_NUM,
    CALLBACK_NUM_PRES_IND,
    CALLBACK_NUM_ATAG,
    SOURCE_SUBADDRESS,
    DEST_SUBADDRESS,
    DISPLAY_TIME,
    SMS_SIGNAL,
    MS_VALIDITY,
    MS_MSG_WAIT_FACILITIES,
    ALERT_ON_MSG_DELIVERY,
    LANGUAGE_INDICATOR,
];
const SUBMIT_MULTI_RESP_FIELDS: &[FieldSpec] = &[MESSAGE_ID, UNSUCCESS_SMES];

const DELIVER_SM_TLVS: &[TlvSpec] = &[
    USER_MESSAGE_REFERENCE,
    SOURCE_PORT,
    DESTINATION_PORT,
    SAR_MSG_REF_NUM,
    SAR_TOTAL_SEGMENTS,
    SAR_SEGMENT_SEQNUM,
    USER_RESPONSE_CODE,
    PRIVACY_INDICATOR,
    PAYLOAD_TYPE,
    MESSAGE_PAYLOAD,
    CALLBACK_NUM,
    SOURCE_SUBADDRESS,
    DEST_SUBADDRESS,
    LANGUAGE_INDICATOR,
    ITS_SESSION_INFO,
    NETWORK_ERROR_CODE,
    MESSAGE_STATE_OPTION,
    RECEIPTED_MESSAGE_ID,
];

const REPLACE_SM_FIELDS: &[FieldSpec] = &[
    MESSAGE_ID,
    SOURCE_ADDR_TON,
    SOURCE_ADDR_NPI,
    SOURCE_ADDR,
    SCHEDULE_DELIVERY_TIME,
    VALIDITY_PERIOD,
    REGISTERED_DELIVERY,
    SM_DEFAULT_MSG_ID,
    SHORT_MESSAGE,
];

const CANCEL_SM_FIELDS: &[FieldSpec] = &[
    SERVICE_TYPE,
    MESSAGE_ID,
    SOURCE_ADDR_TON,
    SOURCE_ADDR_NPI,
    SOURCE_ADDR,
    DEST_ADDR_TON,
    DEST_ADDR_NPI,
    DESTINATION_ADDR,
];

const ALERT_NOTIFICATION_FIELDS: &[FieldSpec] = &[
    SOURCE_ADDR_TON,
    SOURCE_ADDR_NPI,
    SOURCE_ADDR_LONG,
    ESME_ADDR_TON,
    ESME_ADDR_NPI,
    ESME_ADDR,
];
const ALERT_NOTIFICATION_TLVS: &[TlvSpec] = &[MS_AVAILABILITY_STATUS];

const DATA_SM_FIELDS: &[FieldSpec] = &[
    SERVICE_TYPE,
    SOURCE_ADDR_TON,
    SOURCE_ADDR_NPI,
    SOURCE_ADDR_LONG,
    DEST_ADDR_TON,
    DEST_ADDR_NPI,
    DESTINATION_ADDR_LONG,
    ESM_CLASS,
    REGISTERED_DELIVERY,
    DATA_CODING,
];
const DATA_SM_TLVS: &[TlvSpec] = &[
    SOURCE_PORT,
    SOURCE_ADDR_SUBUNIT,
    SOURCE_NETWORK_TYPE,
    SOURCE_BEARER_TYPE,
    SOURCE_TELEMATICS_ID,
    DESTINATION_PORT,
    DEST_ADDR_SUBUNIT,
    DEST_NETWORK_TYPE,
    DEST_BEARER_TYPE,
    DEST_TELEMATICS_ID,
    SAR_MSG_REF_NUM,
    SAR_TOTAL_SEGMENTS,
    SAR_SEGMENT_SEQNUM,
    MORE_MESSAGES_TO_SEND,
    QOS_TIME_TO_LIVE,
    PAYLOAD_TYPE,
    MESSAGE_PAYLOAD,
    SET_DPF,
    RECEIPTED_MESSAGE_ID,
    MESSAGE_STATE_OPTION,
    NETWORK_ERROR_CODE,
    USER_MESSAGE_REFERENCE,
    PRIVACY_INDICATOR,
    CALLBACK_NUM,
    CALLBACK_NUM_PRES_IND,
    CALLBACK_NUM_ATAG,
    SOURCE_SUBADDRESS,
    DEST_SUBADDRESS,
    USER_RESPONSE_CODE,
    DISPLAY_TIME,
    SMS_SIGNAL,
    MS_VALIDITY,
    MS_MSG_WAIT_FACILITIES,
    NUMBER_OF_MESSAGES,
    ALERT_ON_MSG_DELIVERY,
    LANGUAGE_INDICATOR,
    ITS_REPLY_TYPE,
    ITS_SESSION_INFO,
];
const DATA_SM_RESP_TLVS: &[TlvSpec] = &[
    DELIVERY_FAILURE_REASON,
    NETWORK_ERROR_CODE,
    ADDITIONAL_STATUS_INFO_TEXT,
    DPF_RESULT,
];

// ---- 布局表 ----

static GENERIC_NACK: MessageLayout =
    MessageLayout::new(MessageType::GenericNack, NO_FIELDS, NO_TLVS);
static BIND_RECEIVER: MessageLayout =
    MessageLayout::new(MessageType::BindReceiver, BIND_FIELDS, NO_TLVS);
static BIND_RECEIVER_RESP: MessageLayout =
    MessageLayout::new(MessageType::BindReceiverResp, BIND_RESP_FIELDS, BIND_RESP_TLVS);
static BIND_TRANSMITTER: MessageLayout =
    MessageLayout::new(MessageType::BindTransmitter, BIND_FIELDS, NO_TLVS);
static BIND_TRANSMITTER_RESP: MessageLayout =
    MessageLayout::new(MessageType::BindTransmitterResp, BIND_RESP_FIELDS, BIND_RESP_TLVS);
static QUERY_SM: MessageLayout = MessageLayout::new(MessageType::QuerySm, QUERY_SM_FIELDS, NO_TLVS);
static QUERY_SM_RESP: MessageLayout =
    MessageLayout::new(MessageType::QuerySmResp, QUERY_SM_RESP_FIELDS, NO_TLVS);
static SUBMIT_SM: MessageLayout =
    MessageLayout::new(MessageType::SubmitSm, SUBMIT_SM_FIELDS, SUBMIT_SM_TLVS);
static SUBMIT_SM_RESP: MessageLayout =
    MessageLayout::new(MessageType::SubmitSmResp, MESSAGE_ID_FIELDS, NO_TLVS);
static DELIVER_SM: MessageLayout =
    MessageLayout::new(MessageType::DeliverSm, SUBMIT_SM_FIELDS, DELIVER_SM_TLVS);
static DELIVER_SM_RESP: MessageLayout =
    MessageLayout::new(MessageType::DeliverSmResp, MESSAGE_ID_FIELDS, NO_TLVS);
static UNBIND: MessageLayout = MessageLayout::new(MessageType::Unbind, NO_FIELDS, NO_TLVS);
static UNBIND_RESP: MessageLayout =
    MessageLayout::new(MessageType::UnbindResp, NO_FIELDS, NO_TLVS);
static REPLACE_SM: MessageLayout =
    MessageLayout::new(MessageType::ReplaceSm, REPLACE_SM_FIELDS, NO_TLVS);
static REPLACE_SM_RESP: MessageLayout =
    MessageLayout::new(MessageType::ReplaceSmResp, NO_FIELDS, NO_TLVS);
static CANCEL_SM: MessageLayout =
    MessageLayout::new(MessageType::CancelSm, CANCEL_SM_FIELDS, NO_TLVS);
static CANCEL_SM_RESP: MessageLayout =
    MessageLayout::new(MessageType::CancelSmResp, NO_FIELDS, NO_TLVS);
static BIND_TRANSCEIVER: MessageLayout =
    MessageLayout::new(MessageType::BindTransceiver, BIND_FIELDS, NO_TLVS);
static BIND_TRANSCEIVER_RESP: MessageLayout =
    MessageLayout::new(MessageType::BindTransceiverResp, BIND_RESP_FIELDS, BIND_RESP_TLVS);
static OUTBIND: MessageLayout = MessageLayout::new(MessageType::Outbind, OUTBIND_FIELDS, NO_TLVS);
static ENQUIRE_LINK: MessageLayout =
    MessageLayout::new(MessageType::EnquireLink, NO_FIELDS, NO_TLVS);
static ENQUIRE_LINK_RESP: MessageLayout =
    MessageLayout::new(MessageType::EnquireLinkResp, NO_FIELDS, NO_TLVS);
static SUBMIT_MULTI: MessageLayout =
    MessageLayout::new(MessageType::SubmitMulti, SUBMIT_MULTI_FIELDS, SUBMIT_MULTI_TLVS);
static SUBMIT_MULTI_RESP: MessageLayout =
    MessageLayout::new(MessageType::SubmitMultiResp, SUBMIT_MULTI_RESP_FIELDS, NO_TLVS)
        .unsupported("SUBMIT_MULTI_RESP 的 unsuccess_sme 列表尚未实现");
static ALERT_NOTIFICATION: MessageLayout = MessageLayout::new(
    MessageType::AlertNotification,
    ALERT_NOTIFICATION_FIELDS,
    ALERT_NOTIFICATION_TLVS,
)
.unsupported("ALERT_NOTIFICATION 尚未实现");
static DATA_SM: MessageLayout = MessageLayout::new(MessageType::DataSm, DATA_SM_FIELDS, DATA_SM_TLVS);
static DATA_SM_RESP: MessageLayout =
    MessageLayout::new(MessageType::DataSmResp, MESSAGE_ID_FIELDS, DATA_SM_RESP_TLVS);

/// 查找消息类型的字段布局
pub fn layout(message_type: MessageType) -> &'static MessageLayout {
    match message_type {
        MessageType::GenericNack => &GENERIC_NACK,
        MessageType::BindReceiver => &BIND_RECEIVER,
        MessageType::BindReceiverResp => &BIND_RECEIVER_RESP,
        MessageType::BindTransmitter => &BIND_TRANSMITTER,
        MessageType::BindTransmitterResp => &BIND_TRANSMITTER_RESP,
        MessageType::QuerySm => &QUERY_SM,
        MessageType::QuerySmResp => &QUERY_SM_RESP,
        MessageType::SubmitSm => &SUBMIT_SM,
        MessageType::SubmitSmResp => &SUBMIT_SM_RESP,
        MessageType::DeliverSm => &DELIVER_SM,
        MessageType::DeliverSmResp => &DELIVER_SM_RESP,
        MessageType::Unbind => &UNBIND,
        MessageType::UnbindResp => &UNBIND_RESP,
        MessageType::ReplaceSm => &REPLACE_SM,
        MessageType::ReplaceSmResp => &REPLACE_SM_RESP,
        MessageType::CancelSm => &CANCEL_SM,
        MessageType::CancelSmResp => &CANCEL_SM_RESP,
        MessageType::BindTransceiver => &BIND_TRANSCEIVER,
        MessageType::BindTransceiverResp => &BIND_TRANSCEIVER_RESP,
        MessageType::Outbind => &OUTBIND,
        MessageType::EnquireLink => &ENQUIRE_LINK,
        MessageType::EnquireLinkResp => &ENQUIRE_LINK_RESP,
        MessageType::SubmitMulti => &SUBMIT_MULTI,
        MessageType::SubmitMultiResp => &SUBMIT_MULTI_RESP,
        MessageType::AlertNotification => &ALERT_NOTIFICATION,
        MessageType::DataSm => &DATA_SM,
        MessageType::DataSmResp => &DATA_SM_RESP,
    }
}
